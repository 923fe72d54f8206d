use num_derive::FromPrimitive;

/// I2C slave address
pub const I2C_SAD: u8 = 0b001_1110;

/// Address byte selecting a write transfer
pub const I2C_SAD_W: u8 = I2C_SAD << 1;

/// Address byte selecting a read transfer
pub const I2C_SAD_R: u8 = (I2C_SAD << 1) | 1;

/// Register mapping
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Configuration register A
    CRA = 0x00,
    /// Configuration register B
    CRB = 0x01,
    /// Mode register
    MR = 0x02,
    /// X output, high byte
    OUT_X_H = 0x03,
    /// X output, low byte
    OUT_X_L = 0x04,
    /// Z output, high byte
    OUT_Z_H = 0x05,
    /// Z output, low byte
    OUT_Z_L = 0x06,
    /// Y output, high byte
    OUT_Y_H = 0x07,
    /// Y output, low byte
    OUT_Y_L = 0x08,
    /// Status register
    SR = 0x09,
    /// Identification register A
    IRA = 0x0A,
    /// Identification register B
    IRB = 0x0B,
    /// Identification register C
    IRC = 0x0C,
}

impl Register {
    /// Get register address
    pub fn addr(self) -> u8 {
        self as u8
    }
}

// === CRA (00h) ===

pub const MA_MASK: u8 = 0b0110_0000;
pub const DO_MASK: u8 = 0b0001_1100;
pub const MS_MASK: u8 = 0b0000_0011;

/// Number of samples averaged per measurement output
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
    /// 1 sample
    One = 0b00,
    /// 2 samples
    Two = 0b01,
    /// 4 samples
    Four = 0b10,
    /// 8 samples
    Eight = 0b11,
}

/// Data output rate in continuous-measurement mode
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputRate {
    /// 0.75 Hz
    Hz0_75 = 0b000,
    /// 1.5 Hz
    Hz1_5 = 0b001,
    /// 3 Hz
    Hz3 = 0b010,
    /// 7.5 Hz
    Hz7_5 = 0b011,
    /// 15 Hz
    Hz15 = 0b100,
    /// 30 Hz
    Hz30 = 0b101,
    /// 75 Hz
    Hz75 = 0b110,
}

/// Measurement configuration (bias applied across the sensor)
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// Normal measurement, no bias
    Normal = 0b00,
    /// Positive self-test bias on all axes
    PositiveBias = 0b01,
    /// Negative self-test bias on all axes
    NegativeBias = 0b10,
}

// === CRB (01h) ===

pub const GN_MASK: u8 = 0b1110_0000;

/// Gain setting, named by sensitivity in LSb/Gauss
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// ±0.88 Ga, 1370 LSb/Ga
    Lsb1370 = 0b000,
    /// ±1.3 Ga, 1090 LSb/Ga
    Lsb1090 = 0b001,
    /// ±1.9 Ga, 820 LSb/Ga
    Lsb820 = 0b010,
    /// ±2.5 Ga, 660 LSb/Ga
    Lsb660 = 0b011,
    /// ±4.0 Ga, 440 LSb/Ga
    Lsb440 = 0b100,
    /// ±4.7 Ga, 390 LSb/Ga
    Lsb390 = 0b101,
    /// ±5.6 Ga, 330 LSb/Ga
    Lsb330 = 0b110,
    /// ±8.1 Ga, 230 LSb/Ga
    Lsb230 = 0b111,
}

// === MR (02h) ===

pub const MD_MASK: u8 = 0b0000_0011;

/// Operating mode
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Continuous-measurement mode
    Continuous = 0b00,
    /// Single-measurement mode, returns to idle afterwards
    Single = 0b01,
    /// Idle mode
    Idle = 0b10,
}

// === SR (09h) ===

pub const LOCK: u8 = 0b0000_0010;
pub const RDY: u8 = 0b0000_0001;

// === IRA..IRC (0Ah..0Ch) ===

/// Identification registers content, ASCII `"H43"`
pub const DEVICE_ID: [u8; 3] = *b"H43";

// === Self-test ===

/// Expected X and Y counts with positive bias at the self-test gain
pub const SELF_TEST_XY: f32 = 766.0;

/// Expected Z count with positive bias at the self-test gain
pub const SELF_TEST_Z: f32 = 713.0;
