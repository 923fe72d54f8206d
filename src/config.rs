//! Sensor configuration, as written to `CRA`, `CRB` and `MR`

use num_traits::FromPrimitive;

use crate::reg::*;
use crate::Error;

/// Complete sensor configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// `CRA`: `MA`
    pub averaging: Averaging,
    /// `CRA`: `DO`
    pub rate: OutputRate,
    /// `CRA`: `MS`
    pub measurement: MeasurementMode,
    /// `CRB`: `GN`
    pub gain: Gain,
    /// `MR`: `MD`
    pub mode: OperatingMode,
}

impl Default for Config {
    /// Normal run: 8 samples averaged, 15 Hz, no bias,
    /// gain code 6, continuous measurement
    fn default() -> Self {
        Self {
            averaging: Averaging::Eight,
            rate: OutputRate::Hz15,
            measurement: MeasurementMode::Normal,
            gain: Gain::Lsb330,
            mode: OperatingMode::Continuous,
        }
    }
}

impl Config {
    /// Self-test run: positive bias, gain code 3, single measurement
    pub fn self_test() -> Self {
        Self {
            measurement: MeasurementMode::PositiveBias,
            gain: Gain::Lsb660,
            mode: OperatingMode::Single,
            ..Self::default()
        }
    }

    /// `CRA` register value.
    /// Bit 7 is reserved and always written as zero.
    pub fn reg_a(&self) -> u8 {
        ((self.averaging as u8) << 5) | ((self.rate as u8) << 2) | self.measurement as u8
    }

    /// `CRB` register value
    pub fn reg_b(&self) -> u8 {
        (self.gain as u8) << 5
    }

    /// `MR` register value
    pub fn reg_mode(&self) -> u8 {
        self.mode as u8
    }

    /// Decode register values read back from the device
    pub fn decode(cra: u8, crb: u8, mr: u8) -> Result<Self, Error> {
        let invalid = |reg: Register, value: u8| Error::InvalidValue { reg, value };

        let averaging =
            Averaging::from_u8((cra & MA_MASK) >> 5).ok_or(invalid(Register::CRA, cra))?;
        let rate =
            OutputRate::from_u8((cra & DO_MASK) >> 2).ok_or(invalid(Register::CRA, cra))?;
        let measurement =
            MeasurementMode::from_u8(cra & MS_MASK).ok_or(invalid(Register::CRA, cra))?;
        let gain = Gain::from_u8((crb & GN_MASK) >> 5).ok_or(invalid(Register::CRB, crb))?;
        // both 10 and 11 select idle
        let mode = match mr & MD_MASK {
            0b11 => OperatingMode::Idle,
            md => OperatingMode::from_u8(md).ok_or(invalid(Register::MR, mr))?,
        };

        Ok(Self {
            averaging,
            rate,
            measurement,
            gain,
            mode,
        })
    }
}
