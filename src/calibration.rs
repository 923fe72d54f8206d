//! Per-axis scale factors

use accelerometer::vector::{I16x3, I32x3};
use cast::f32;

use crate::reg::{SELF_TEST_XY, SELF_TEST_Z};
use crate::Error;

/// Scale factors applied to raw counts
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// X factor
    pub x: f32,
    /// Y factor
    pub y: f32,
    /// Z factor
    pub z: f32,
}

impl Calibration {
    /// No correction
    pub const IDENTITY: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    /// Factors measured once on the reference unit with [`crate::Hmc5883::calibrate`]
    pub const FACTORY: Self = Self {
        x: 0.876_932_174,
        y: 0.930_176_407,
        z: 0.881_334_96,
    };

    /// Derive factors from raw positive-bias self-test counts:
    /// 766 expected on X and Y, 713 on Z
    pub fn from_self_test(raw: I16x3) -> Result<Self, Error> {
        if raw.x == 0 || raw.y == 0 || raw.z == 0 {
            return Err(Error::SelfTest);
        }
        Ok(Self {
            x: SELF_TEST_XY / f32(raw.x),
            y: SELF_TEST_XY / f32(raw.y),
            z: SELF_TEST_Z / f32(raw.z),
        })
    }

    /// Scale a raw sample.
    ///
    /// The product is truncated toward zero into 32 bits, so factors
    /// above one cannot wrap the result.
    pub fn apply(&self, raw: I16x3) -> I32x3 {
        I32x3::new(
            scale(raw.x, self.x),
            scale(raw.y, self.y),
            scale(raw.z, self.z),
        )
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::FACTORY
    }
}

#[inline]
fn scale(raw: i16, factor: f32) -> i32 {
    (f32(raw) * factor) as i32
}
