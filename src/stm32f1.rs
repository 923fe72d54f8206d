//! [`BusPort`] on the STM32F103 `I2C1` peripheral.
//!
//! The caller enables the `GPIOB` and `I2C1` clocks and puts `PB6`/`PB7`
//! into alternate function open-drain mode before calling
//! [`I2c1Port::new`].

#![allow(unsafe_code, unused_unsafe)]

use stm32f1::stm32f103::I2C1;

use crate::BusPort;

/// `CR2`: `FREQ`, APB1 clock in MHz
const APB1_MHZ: u8 = 8;

/// `CCR`: `CCR`, 40 × 125 ns high time, 100 kHz in standard mode
const CCR_100KHZ: u16 = 0x28;

/// `TRISE`: `TRISE`, 1000 ns maximum rise time at 8 MHz, plus one
const TRISE_STANDARD: u8 = 0x09;

/// `I2C1` as a bus port
pub struct I2c1Port {
    i2c: I2C1,
}

impl I2c1Port {
    /// Take the peripheral and set it up as a 100 kHz standard mode master
    pub fn new(i2c: I2C1) -> Self {
        i2c.cr1.modify(|_, w| w.pe().clear_bit());
        i2c.cr2.modify(|_, w| unsafe { w.freq().bits(APB1_MHZ) });
        i2c.ccr
            .modify(|_, w| unsafe { w.f_s().clear_bit().ccr().bits(CCR_100KHZ) });
        i2c.trise.modify(|_, w| unsafe { w.trise().bits(TRISE_STANDARD) });
        i2c.cr1.modify(|_, w| w.pe().set_bit());
        Self { i2c }
    }

    /// Disable the peripheral and hand it back
    pub fn free(self) -> I2C1 {
        self.i2c.cr1.modify(|_, w| w.pe().clear_bit());
        self.i2c
    }
}

impl BusPort for I2c1Port {
    fn request_start(&mut self) {
        self.i2c.cr1.modify(|_, w| w.start().set_bit());
    }

    fn start_sent(&mut self) -> bool {
        self.i2c.sr1.read().sb().bit_is_set()
    }

    fn write_data(&mut self, byte: u8) {
        self.i2c.dr.write(|w| unsafe { w.dr().bits(byte) });
    }

    fn read_data(&mut self) -> u8 {
        self.i2c.dr.read().dr().bits()
    }

    fn address_acked(&mut self) -> bool {
        self.i2c.sr1.read().addr().bit_is_set()
    }

    fn ack_failed(&mut self) -> bool {
        self.i2c.sr1.read().af().bit_is_set()
    }

    fn clear_ack_failure(&mut self) {
        self.i2c.sr1.modify(|_, w| w.af().clear_bit());
    }

    fn read_status1(&mut self) {
        let _ = self.i2c.sr1.read();
    }

    fn read_status2(&mut self) {
        let _ = self.i2c.sr2.read();
    }

    fn byte_transferred(&mut self) -> bool {
        self.i2c.sr1.read().btf().bit_is_set()
    }

    fn rx_not_empty(&mut self) -> bool {
        self.i2c.sr1.read().rx_ne().bit_is_set()
    }

    fn set_auto_ack(&mut self, enable: bool) {
        self.i2c.cr1.modify(|_, w| w.ack().bit(enable));
    }

    fn request_stop(&mut self) {
        self.i2c.cr1.modify(|_, w| w.stop().set_bit());
    }

    fn stop_pending(&mut self) -> bool {
        self.i2c.cr1.read().stop().bit_is_set()
    }
}
