//! Ring of eight direction outputs plus a warning output

use embedded_hal as hal;
use hal::digital::v2::OutputPin;

use crate::heading::{Heading, SECTORS};

/// Direction indicator
pub struct LedRing<P, W> {
    /// One output per sector, `leds[0]` shows sector 0 (+X)
    leds: [P; SECTORS as usize],
    /// Lit when the heading is not reliable
    warning: W,
}

impl<P, W, E> LedRing<P, W>
where
    P: OutputPin<Error = E>,
    W: OutputPin<Error = E>,
{
    /// Create a ring from sector outputs ordered counter-clockwise from +X
    pub fn new(leds: [P; SECTORS as usize], warning: W) -> Self {
        Self { leds, warning }
    }

    /// Destroy the ring, return the outputs
    pub fn destroy(self) -> ([P; SECTORS as usize], W) {
        (self.leds, self.warning)
    }

    /// Switch every output off
    pub fn clear(&mut self) -> Result<(), E> {
        for led in self.leds.iter_mut() {
            led.set_low()?;
        }
        self.warning.set_low()
    }

    /// Light the sector of `heading` and flag an unreliable heading
    pub fn show(&mut self, heading: &Heading) -> Result<(), E> {
        for led in self.leds.iter_mut() {
            led.set_low()?;
        }
        if heading.is_reliable() {
            self.warning.set_low()?;
        } else {
            self.warning.set_high()?;
        }
        self.leds[usize::from(heading.sector())].set_high()
    }
}
