//! Hand-rolled I2C master.
//!
//! The bus peripheral is reached through [`BusPort`], a flag-level view of
//! its control, status and data registers. [`Bus`] builds the transaction
//! primitives on top of it: start, address, write one byte, read one byte,
//! stop. Every primitive busy-waits on a status flag.
//!
//! The only legal sequences are
//! `begin → address → write_byte… → end` and
//! `begin → address → read_byte → end`.
//! Anything else leaves the peripheral in an inconsistent state.
//! [`Bus::write`] and [`Bus::read`] send a stop when a wait fails after the
//! start condition, so a bounded wait leaves the bus usable.

use core::hint::spin_loop;

use crate::Error;

/// Flag-level access to an I2C master peripheral.
///
/// Status accessors may have read side effects on real hardware (reading
/// the status register is part of clearing several flags), so they take
/// `&mut self`.
pub trait BusPort {
    /// Request a start condition
    fn request_start(&mut self);

    /// Start condition generated (`SB`)
    fn start_sent(&mut self) -> bool;

    /// Write the data register
    fn write_data(&mut self, byte: u8);

    /// Read the data register, clears `RxNE`
    fn read_data(&mut self) -> u8;

    /// Address sent and acknowledged (`ADDR`)
    fn address_acked(&mut self) -> bool;

    /// Acknowledge failure (`AF`)
    fn ack_failed(&mut self) -> bool;

    /// Clear the acknowledge failure flag
    fn clear_ack_failure(&mut self);

    /// Plain read of status register 1
    fn read_status1(&mut self);

    /// Plain read of status register 2
    fn read_status2(&mut self);

    /// Byte transfer finished (`BTF`)
    fn byte_transferred(&mut self) -> bool;

    /// Receive data register not empty (`RxNE`)
    fn rx_not_empty(&mut self) -> bool;

    /// Acknowledge received bytes (`ACK`)
    fn set_auto_ack(&mut self, enable: bool);

    /// Request a stop condition
    fn request_stop(&mut self);

    /// Stop condition still pending (`STOP` not yet cleared by hardware)
    fn stop_pending(&mut self) -> bool;
}

impl<P: BusPort + ?Sized> BusPort for &mut P {
    fn request_start(&mut self) {
        (**self).request_start()
    }
    fn start_sent(&mut self) -> bool {
        (**self).start_sent()
    }
    fn write_data(&mut self, byte: u8) {
        (**self).write_data(byte)
    }
    fn read_data(&mut self) -> u8 {
        (**self).read_data()
    }
    fn address_acked(&mut self) -> bool {
        (**self).address_acked()
    }
    fn ack_failed(&mut self) -> bool {
        (**self).ack_failed()
    }
    fn clear_ack_failure(&mut self) {
        (**self).clear_ack_failure()
    }
    fn read_status1(&mut self) {
        (**self).read_status1()
    }
    fn read_status2(&mut self) {
        (**self).read_status2()
    }
    fn byte_transferred(&mut self) -> bool {
        (**self).byte_transferred()
    }
    fn rx_not_empty(&mut self) -> bool {
        (**self).rx_not_empty()
    }
    fn set_auto_ack(&mut self, enable: bool) {
        (**self).set_auto_ack(enable)
    }
    fn request_stop(&mut self) {
        (**self).request_stop()
    }
    fn stop_pending(&mut self) -> bool {
        (**self).stop_pending()
    }
}

/// Busy-wait budget
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitLimit {
    /// Poll forever; a missing device hangs the caller.
    /// Acknowledge failure is not reported.
    Unbounded,
    /// Give up after the given number of polls and report
    /// acknowledge failure as an error
    Polls(u32),
}

impl Default for WaitLimit {
    fn default() -> Self {
        WaitLimit::Unbounded
    }
}

/// Condition a busy-wait is polling for
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    /// `SB` after a start request
    StartSent,
    /// `ADDR` or `AF` after the address byte
    AddressAck,
    /// `BTF` after a data byte
    ByteTransferred,
    /// `RxNE` while receiving
    RxNotEmpty,
    /// `STOP` cleared by hardware
    StopSent,
}

/// I2C transaction primitives over a [`BusPort`]
pub struct Bus<P> {
    port: P,
    limit: WaitLimit,
}

impl<P> Bus<P>
where
    P: BusPort,
{
    /// Bus with unbounded waits
    pub fn new(port: P) -> Self {
        Self::with_limit(port, WaitLimit::Unbounded)
    }

    /// Bus with the given wait budget
    pub fn with_limit(port: P, limit: WaitLimit) -> Self {
        Self { port, limit }
    }

    /// Current wait budget
    pub fn limit(&self) -> WaitLimit {
        self.limit
    }

    /// Destroy bus instance, return the port
    pub fn release(self) -> P {
        self.port
    }

    /// Generate a start condition.
    ///
    /// Leaves `SB` half cleared: status register 1 has been read, the
    /// following data register write (the address) completes the clear.
    pub fn begin(&mut self) -> Result<(), Error> {
        self.port.request_start();
        self.wait_for(Wait::StartSent, |p| p.start_sent())?;
        self.port.read_status1();
        Ok(())
    }

    /// Send the address byte (`7-bit address << 1 | R/W`).
    ///
    /// Must directly follow [`Bus::begin`]. Returns once `ADDR` has been
    /// cleared by reading status registers 1 and 2.
    ///
    /// With a bounded [`WaitLimit`] a missing acknowledge releases the bus
    /// with a stop condition and returns [`Error::AckFailure`].
    pub fn address(&mut self, addr_rw: u8) -> Result<(), Error> {
        self.port.write_data(addr_rw);
        self.wait_for(Wait::AddressAck, |p| p.address_acked() || p.ack_failed())?;

        if let WaitLimit::Polls(_) = self.limit {
            if self.port.ack_failed() {
                warn!("i2c: no acknowledge for address {=u8:#x}", addr_rw);
                self.port.clear_ack_failure();
                self.end()?;
                return Err(Error::AckFailure);
            }
        }

        self.port.read_status1();
        self.port.read_status2();
        Ok(())
    }

    /// Transmit one data byte, wait for `BTF`
    pub fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.port.write_data(byte);
        self.wait_for(Wait::ByteTransferred, |p| p.byte_transferred())
    }

    /// Receive a single byte and answer it with NACK.
    ///
    /// `ACK` is cleared before waiting and set again afterwards, also when
    /// the wait fails.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        self.port.set_auto_ack(false);
        let received = self.wait_for(Wait::RxNotEmpty, |p| p.rx_not_empty());
        let byte = received.map(|_| self.port.read_data());
        self.port.set_auto_ack(true);
        byte
    }

    /// Generate a stop condition, wait until hardware has sent it
    pub fn end(&mut self) -> Result<(), Error> {
        self.port.request_stop();
        self.wait_for(Wait::StopSent, |p| !p.stop_pending())
    }

    /// One write transaction: address for write, then `bytes`
    pub fn write(&mut self, addr_w: u8, bytes: &[u8]) -> Result<(), Error> {
        trace!("i2c: write {=u8:#x} {=[u8]:#x}", addr_w, bytes);
        self.begin()?;
        let sent = self.address(addr_w).and_then(|_| {
            for &byte in bytes {
                self.write_byte(byte)?;
            }
            Ok(())
        });
        self.release_on_error(sent)?;
        self.end()
    }

    /// One read transaction: address for read, then a single byte
    pub fn read(&mut self, addr_r: u8) -> Result<u8, Error> {
        self.begin()?;
        let received = self.address(addr_r).and_then(|_| self.read_byte());
        let byte = self.release_on_error(received)?;
        self.end()?;
        trace!("i2c: read {=u8:#x} -> {=u8:#x}", addr_r, byte);
        Ok(byte)
    }

    /// Stop a transfer that failed after its start condition.
    ///
    /// A missing acknowledge has already been answered with a stop by
    /// [`Bus::address`]. A failing stop is not reported, the transfer error is.
    fn release_on_error<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(e) = &result {
            if *e != Error::AckFailure {
                warn!("i2c: releasing bus after {}", e);
                let _ = self.end();
            }
        }
        result
    }

    fn wait_for<F>(&mut self, what: Wait, mut ready: F) -> Result<(), Error>
    where
        F: FnMut(&mut P) -> bool,
    {
        match self.limit {
            WaitLimit::Unbounded => {
                while !ready(&mut self.port) {
                    spin_loop();
                }
                Ok(())
            }
            WaitLimit::Polls(polls) => {
                for _ in 0..polls {
                    if ready(&mut self.port) {
                        return Ok(());
                    }
                    spin_loop();
                }
                warn!("i2c: timeout waiting for {}", what);
                Err(Error::Timeout(what))
            }
        }
    }
}
