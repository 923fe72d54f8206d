//! Compass update loop: acquire, compute heading, show it, wait

use embedded_hal as hal;
use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;

use crate::heading::Heading;
use crate::indicator::LedRing;
use crate::{BusPort, Error, Hmc5883};

/// Pause between updates, shorter than the 1/15 s output period of the
/// default configuration so no sample is skipped
pub const SAMPLE_PERIOD_MS: u16 = 20;

/// Compass update error
#[derive(Debug, PartialEq)]
pub enum UpdateError<E> {
    /// Sensor access failed
    Sensor(Error),
    /// Indicator output failed
    Indicator(E),
}

impl<E> From<Error> for UpdateError<E> {
    fn from(e: Error) -> Self {
        UpdateError::Sensor(e)
    }
}

/// Magnetometer wired to an indicator ring
pub struct Compass<BP, P, W> {
    sensor: Hmc5883<BP>,
    ring: LedRing<P, W>,
}

impl<BP, P, W, E> Compass<BP, P, W>
where
    BP: BusPort,
    P: OutputPin<Error = E>,
    W: OutputPin<Error = E>,
{
    /// Combine a sensor and a ring, nothing is sent to either
    pub fn new(sensor: Hmc5883<BP>, ring: LedRing<P, W>) -> Self {
        Self { sensor, ring }
    }

    /// Destroy the compass, return its parts
    pub fn destroy(self) -> (Hmc5883<BP>, LedRing<P, W>) {
        (self.sensor, self.ring)
    }

    /// Configure the sensor and switch the ring off
    pub fn start(&mut self) -> Result<(), UpdateError<E>> {
        self.sensor.configure()?;
        self.ring.clear().map_err(UpdateError::Indicator)
    }

    /// One loop iteration, ends with a [`SAMPLE_PERIOD_MS`] pause
    pub fn update<D>(&mut self, delay: &mut D) -> Result<Heading, UpdateError<E>>
    where
        D: DelayMs<u16>,
    {
        let sample = self.sensor.acquire_sample()?;
        let heading = Heading::from_sample(sample);
        trace!(
            "compass: ({}, {}, {}) azimuth {} polar {}",
            sample.x,
            sample.y,
            sample.z,
            heading.azimuth,
            heading.polar
        );
        self.ring.show(&heading).map_err(UpdateError::Indicator)?;
        delay.delay_ms(SAMPLE_PERIOD_MS);
        Ok(heading)
    }
}
