//! Field direction from a calibrated sample

use core::f64::consts::PI;

use accelerometer::vector::I32x3;

/// Polar angles at or beyond this limit (degrees) make the azimuth unreliable
pub const POLAR_LIMIT_DEG: f64 = 70.0;

/// Number of indicator sectors around the XY plane
pub const SECTORS: u8 = 8;

const SECTOR_WIDTH_DEG: f64 = 360.0 / SECTORS as f64;

/// Direction of the measured field
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Heading {
    /// Angle in the XY plane from +X toward +Y, degrees in `[0, 360)`
    pub azimuth: f64,
    /// Angle between the field and the XY plane, degrees in `[-90, 90]`
    pub polar: f64,
}

impl Heading {
    /// Heading of the field vector `(x, y, z)`
    pub fn from_components(x: f64, y: f64, z: f64) -> Self {
        let mut azimuth = to_degrees(libm::atan2(y, x));
        if azimuth < 0.0 {
            azimuth += 360.0;
        }
        let planar = libm::sqrt(x * x + y * y);
        let polar = to_degrees(libm::atan2(z, planar));
        Self { azimuth, polar }
    }

    /// Heading of a calibrated sample
    pub fn from_sample(sample: I32x3) -> Self {
        Self::from_components(f64::from(sample.x), f64::from(sample.y), f64::from(sample.z))
    }

    /// Sector index, `0` is centred on +X and indices grow
    /// counter-clockwise in 45° steps. A boundary belongs to the higher sector.
    pub fn sector(&self) -> u8 {
        let shifted = self.azimuth + SECTOR_WIDTH_DEG / 2.0;
        (libm::floor(shifted / SECTOR_WIDTH_DEG) as u8) % SECTORS
    }

    /// The field is not too close to the Z axis
    pub fn is_reliable(&self) -> bool {
        libm::fabs(self.polar) < POLAR_LIMIT_DEG
    }
}

#[inline]
fn to_degrees(rad: f64) -> f64 {
    rad * (180.0 / PI)
}
