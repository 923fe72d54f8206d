//! HMC5883 3-axis magnetometer driver with a hand-rolled I2C master.
//!
//! The I2C transactions are driven directly against the peripheral's
//! control and status flags through the [`BusPort`] trait, so the driver
//! runs on bare metal without a HAL and can be exercised on the host
//! against a simulated peripheral.
//!
//! ```ignore
//! let mut dev = Hmc5883::new(Bus::new(port));
//! dev.configure()?;
//! loop {
//!     let sample = dev.acquire_sample()?;
//!     // ...
//! }
//! ```
//!
//! On top of the sensor the crate provides the compass itself: heading
//! computation ([`heading`]), an eight-output indicator ring driven through
//! [embedded-hal] pins ([`indicator`]) and the paced update loop
//! ([`compass`]).
//!
//! [embedded-hal]: https://docs.rs/embedded-hal
//!

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![no_std]

#[macro_use]
mod fmt;

mod bus;
mod calibration;
pub mod compass;
mod config;
pub mod heading;
pub mod indicator;
mod reg;
#[cfg(feature = "stm32f1")]
pub mod stm32f1;

pub use accelerometer::vector::{I16x3, I32x3};
use cast::u16;

pub use crate::bus::{Bus, BusPort, Wait, WaitLimit};
pub use crate::calibration::Calibration;
pub use crate::config::Config;
use crate::reg::*;
pub use crate::reg::{
    Averaging, Gain, MeasurementMode, OperatingMode, OutputRate, Register, DEVICE_ID, I2C_SAD,
};

/// Driver error
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The device did not acknowledge its address
    AckFailure,
    /// A busy-wait ran out of polls
    Timeout(Wait),
    /// A self-test axis reading was zero
    SelfTest,
    /// Register holds a reserved field value
    InvalidValue {
        /// Register read
        reg: Register,
        /// Raw content
        value: u8,
    },
}

/// Axis selector
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// (low, high) output registers
    fn regs(self) -> (Register, Register) {
        match self {
            Axis::X => (Register::OUT_X_L, Register::OUT_X_H),
            Axis::Y => (Register::OUT_Y_L, Register::OUT_Y_H),
            Axis::Z => (Register::OUT_Z_L, Register::OUT_Z_H),
        }
    }
}

/// `HMC5883` driver
pub struct Hmc5883<P> {
    /// Transaction primitives over the bus peripheral
    bus: Bus<P>,
    /// Scale factors applied by [`Hmc5883::acquire_sample`]
    cal: Calibration,
}

impl<P> Hmc5883<P>
where
    P: BusPort,
{
    /// Create a new driver using the factory calibration.
    ///
    /// Nothing is sent to the device; call [`Hmc5883::configure`] once
    /// before the first acquisition.
    pub fn new(bus: Bus<P>) -> Self {
        Self::with_calibration(bus, Calibration::FACTORY)
    }

    /// Create a new driver with explicit scale factors
    pub fn with_calibration(bus: Bus<P>, cal: Calibration) -> Self {
        Self { bus, cal }
    }

    /// Destroy driver instance, return the bus
    pub fn destroy(self) -> Bus<P> {
        self.bus
    }

    /// Scale factors in use
    pub fn calibration(&self) -> Calibration {
        self.cal
    }

    /// Replace the scale factors
    pub fn set_calibration(&mut self, cal: Calibration) {
        self.cal = cal;
    }

    /// Read one register.
    ///
    /// Two transactions: the sub-address is written and the bus released
    /// with a stop condition, then a fresh start reads a single byte.
    pub fn read_register(&mut self, reg: Register) -> Result<u8, Error> {
        self.bus.write(I2C_SAD_W, &[reg.addr()])?;
        self.bus.read(I2C_SAD_R)
    }

    /// Write one register, a single transaction
    pub fn write_register(&mut self, reg: Register, val: u8) -> Result<(), Error> {
        self.bus.write(I2C_SAD_W, &[reg.addr(), val])
    }

    /// Normal run configuration, see [`Config::default`]
    pub fn configure(&mut self) -> Result<(), Error> {
        self.configure_with(&Config::default())
    }

    /// Write `CRA`, `CRB` and `MR`.
    ///
    /// Each register is an independent transaction; an error leaves the
    /// registers already written in place.
    pub fn configure_with(&mut self, cfg: &Config) -> Result<(), Error> {
        debug!(
            "hmc5883: CRA={=u8:#b} CRB={=u8:#b} MR={=u8:#b}",
            cfg.reg_a(),
            cfg.reg_b(),
            cfg.reg_mode()
        );
        self.write_register(Register::CRA, cfg.reg_a())?;
        self.write_register(Register::CRB, cfg.reg_b())?;
        self.write_register(Register::MR, cfg.reg_mode())?;
        Ok(())
    }

    /// Read `CRA`, `CRB` and `MR` back
    pub fn read_config(&mut self) -> Result<Config, Error> {
        let cra = self.read_register(Register::CRA)?;
        let crb = self.read_register(Register::CRB)?;
        let mr = self.read_register(Register::MR)?;
        Config::decode(cra, crb, mr)
    }

    /// Positive-bias self-test.
    ///
    /// Switches the device to [`Config::self_test`], takes one raw sample
    /// and derives the scale factors from it. The factors are stored and
    /// returned. The device is left in self-test configuration; call
    /// [`Hmc5883::configure`] before resuming normal acquisition.
    pub fn calibrate(&mut self) -> Result<Calibration, Error> {
        self.configure_with(&Config::self_test())?;
        let raw = self.read_raw()?;
        let cal = Calibration::from_self_test(raw)?;
        debug!(
            "hmc5883: self-test ({}, {}, {}) -> {}",
            raw.x,
            raw.y,
            raw.z,
            cal
        );
        self.cal = cal;
        Ok(cal)
    }

    /// One axis, low byte first
    pub fn read_axis(&mut self, axis: Axis) -> Result<i16, Error> {
        let (lo, hi) = axis.regs();
        let lo = self.read_register(lo)?;
        let hi = self.read_register(hi)?;
        Ok((u16(lo) | (u16(hi) << 8)) as i16)
    }

    /// Unscaled sample, read in X, Y, Z order
    pub fn read_raw(&mut self) -> Result<I16x3, Error> {
        let x = self.read_axis(Axis::X)?;
        let y = self.read_axis(Axis::Y)?;
        let z = self.read_axis(Axis::Z)?;
        Ok(I16x3::new(x, y, z))
    }

    /// Calibrated sample
    pub fn acquire_sample(&mut self) -> Result<I32x3, Error> {
        let raw = self.read_raw()?;
        Ok(self.cal.apply(raw))
    }

    /// Identification registers `IRA`, `IRB`, `IRC`, [`DEVICE_ID`] on a genuine part
    pub fn identify(&mut self) -> Result<[u8; 3], Error> {
        Ok([
            self.read_register(Register::IRA)?,
            self.read_register(Register::IRB)?,
            self.read_register(Register::IRC)?,
        ])
    }

    /// Data ready,
    /// `SR`: `RDY`
    pub fn is_ready(&mut self) -> Result<bool, Error> {
        let reg = self.read_register(Register::SR)?;
        Ok((reg & RDY) != 0)
    }

    /// Output registers locked,
    /// `SR`: `LOCK`
    pub fn is_locked(&mut self) -> Result<bool, Error> {
        let reg = self.read_register(Register::SR)?;
        Ok((reg & LOCK) != 0)
    }
}
