#![allow(dead_code)]

pub use hmc5883::{
    Axis, Bus, BusPort, Calibration, Config, Error, Hmc5883, Register, Wait, WaitLimit,
};

use embedded_hal_mock as hal;
pub use hal::delay::MockNoop as DelayMock;
pub use hal::pin::{Mock as PinMock, State as PinState, Transaction as PinTrans};

pub const DEV_ADDR: u8 = 0b001_1110;

pub const LIMIT: WaitLimit = WaitLimit::Polls(100);

/// Completed bus transaction, as seen by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Txn {
    /// Bytes written after the address
    Write(Vec<u8>),
    /// Bytes read after the address
    Read(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Starting(u32),
    StartSent { sr1_read: bool },
    Addressing { left: u32, read: bool, acked: bool },
    Addressed { read: bool, sr1_read: bool },
    Nacked { cleared: bool },
    Writing { btf: bool },
    Shifting(u32),
    Reading,
    Receiving(u32),
    Received(u8),
    Drained,
    Stopping(u32),
}

/// STM32F1 style I2C master with an HMC5883 on the bus.
///
/// Every access that the reference manual does not allow in the current
/// state panics.
pub struct SimPort {
    phase: Phase,
    ack: bool,
    regs: [u8; 13],
    pointer: usize,
    current: Option<Txn>,
    transactions: Vec<Txn>,
    receptions: Vec<bool>,
    /// Device answers its address
    pub present: bool,
    /// Polls before `SB`, `BTF` and end of `STOP`
    pub latency: u32,
    /// Polls before `ADDR` or `AF`
    pub addr_latency: u32,
    /// Polls before `RxNE`
    pub rx_latency: u32,
}

impl SimPort {
    pub fn new() -> Self {
        let mut regs = [0u8; 13];
        regs[0x00] = 0x10;
        regs[0x01] = 0x20;
        regs[0x02] = 0x01;
        regs[0x0A] = b'H';
        regs[0x0B] = b'4';
        regs[0x0C] = b'3';
        Self {
            phase: Phase::Idle,
            ack: true,
            regs,
            pointer: 0,
            current: None,
            transactions: Vec::new(),
            receptions: Vec::new(),
            present: true,
            latency: 0,
            addr_latency: 0,
            rx_latency: 0,
        }
    }

    /// Same latency on every flag
    pub fn with_latency(polls: u32) -> Self {
        let mut sim = Self::new();
        sim.latency = polls;
        sim.addr_latency = polls;
        sim.rx_latency = polls;
        sim
    }

    pub fn reg(&self, addr: u8) -> u8 {
        self.regs[addr as usize]
    }

    pub fn set_reg(&mut self, addr: u8, val: u8) {
        self.regs[addr as usize] = val;
    }

    /// Store raw axis counts, big endian as the device does
    pub fn set_raw(&mut self, x: i16, y: i16, z: i16) {
        for &(hi, v) in &[(0x03usize, x), (0x07, y), (0x05, z)] {
            let [h, l] = v.to_be_bytes();
            self.regs[hi] = h;
            self.regs[hi + 1] = l;
        }
    }

    pub fn transactions(&self) -> &[Txn] {
        &self.transactions
    }

    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// For every received byte: was `ACK` disabled when it arrived
    pub fn receptions(&self) -> &[bool] {
        &self.receptions
    }

    pub fn ack_enabled(&self) -> bool {
        self.ack
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    fn device_write(&mut self, byte: u8) {
        match self.current {
            Some(Txn::Write(ref mut bytes)) => {
                if bytes.is_empty() {
                    self.pointer = usize::from(byte) % self.regs.len();
                } else {
                    if self.pointer <= 0x02 {
                        self.regs[self.pointer] = byte;
                    }
                    self.pointer = (self.pointer + 1) % self.regs.len();
                }
                bytes.push(byte);
            }
            ref other => panic!("data byte outside a write transaction: {:?}", other),
        }
    }

    fn device_read(&mut self) -> u8 {
        let byte = self.regs[self.pointer];
        self.pointer = (self.pointer + 1) % self.regs.len();
        byte
    }

    fn record_read(&mut self, byte: u8) {
        match self.current {
            Some(Txn::Read(ref mut bytes)) => bytes.push(byte),
            ref other => panic!("data read outside a read transaction: {:?}", other),
        }
    }
}

impl BusPort for SimPort {
    fn request_start(&mut self) {
        match self.phase {
            Phase::Idle => self.phase = Phase::Starting(self.latency),
            p => panic!("start requested in {:?}", p),
        }
    }

    fn start_sent(&mut self) -> bool {
        match self.phase {
            Phase::Starting(0) => {
                self.phase = Phase::StartSent { sr1_read: false };
                true
            }
            Phase::Starting(n) => {
                self.phase = Phase::Starting(n - 1);
                false
            }
            Phase::StartSent { .. } => true,
            _ => false,
        }
    }

    fn write_data(&mut self, byte: u8) {
        match self.phase {
            Phase::StartSent { sr1_read: true } => {
                let read = byte & 1 == 1;
                let acked = self.present && byte >> 1 == DEV_ADDR;
                if acked {
                    self.current = Some(if read {
                        Txn::Read(Vec::new())
                    } else {
                        Txn::Write(Vec::new())
                    });
                }
                self.phase = Phase::Addressing {
                    left: self.addr_latency,
                    read,
                    acked,
                };
            }
            Phase::StartSent { sr1_read: false } => {
                panic!("address written before SR1 was read")
            }
            Phase::Writing { .. } => {
                self.device_write(byte);
                self.phase = Phase::Shifting(self.latency);
            }
            p => panic!("data register written in {:?}", p),
        }
    }

    fn read_data(&mut self) -> u8 {
        match self.phase {
            Phase::Received(byte) => {
                self.phase = Phase::Drained;
                self.record_read(byte);
                byte
            }
            p => panic!("data register read in {:?}", p),
        }
    }

    fn address_acked(&mut self) -> bool {
        match self.phase {
            Phase::Addressing { left: 0, read, acked } => {
                self.phase = if acked {
                    Phase::Addressed {
                        read,
                        sr1_read: false,
                    }
                } else {
                    Phase::Nacked { cleared: false }
                };
                acked
            }
            Phase::Addressing { left, read, acked } => {
                self.phase = Phase::Addressing {
                    left: left - 1,
                    read,
                    acked,
                };
                false
            }
            Phase::Addressed { .. } => true,
            _ => false,
        }
    }

    fn ack_failed(&mut self) -> bool {
        matches!(self.phase, Phase::Nacked { cleared: false })
    }

    fn clear_ack_failure(&mut self) {
        match self.phase {
            Phase::Nacked { .. } => self.phase = Phase::Nacked { cleared: true },
            p => panic!("AF cleared in {:?}", p),
        }
    }

    fn read_status1(&mut self) {
        match self.phase {
            Phase::StartSent { .. } => self.phase = Phase::StartSent { sr1_read: true },
            Phase::Addressed { read, .. } => {
                self.phase = Phase::Addressed {
                    read,
                    sr1_read: true,
                }
            }
            _ => {}
        }
    }

    fn read_status2(&mut self) {
        match self.phase {
            Phase::Addressed {
                read,
                sr1_read: true,
            } => {
                self.phase = if read {
                    Phase::Reading
                } else {
                    Phase::Writing { btf: false }
                }
            }
            Phase::Addressed {
                sr1_read: false, ..
            } => panic!("SR2 read before SR1 while ADDR is set"),
            Phase::Nacked { .. } => panic!("ADDR clearing reads after a NACK"),
            _ => {}
        }
    }

    fn byte_transferred(&mut self) -> bool {
        match self.phase {
            Phase::Shifting(0) => {
                self.phase = Phase::Writing { btf: true };
                true
            }
            Phase::Shifting(n) => {
                self.phase = Phase::Shifting(n - 1);
                false
            }
            Phase::Writing { btf } => btf,
            _ => false,
        }
    }

    fn rx_not_empty(&mut self) -> bool {
        if let Phase::Reading = self.phase {
            self.receptions.push(!self.ack);
            self.phase = Phase::Receiving(self.rx_latency);
        }
        match self.phase {
            Phase::Receiving(0) => {
                let byte = self.device_read();
                self.phase = Phase::Received(byte);
                true
            }
            Phase::Receiving(n) => {
                self.phase = Phase::Receiving(n - 1);
                false
            }
            Phase::Received(_) => true,
            p => panic!("RxNE polled in {:?}", p),
        }
    }

    fn set_auto_ack(&mut self, enable: bool) {
        match self.phase {
            Phase::Reading | Phase::Received(_) if enable => {
                panic!("ACK enabled before the received byte was read")
            }
            Phase::Addressed { .. } | Phase::Writing { .. } | Phase::Shifting(_) if !enable => {
                panic!("ACK disabled in {:?}", self.phase)
            }
            _ => self.ack = enable,
        }
    }

    fn request_stop(&mut self) {
        match self.phase {
            Phase::Writing { btf: true } | Phase::Drained | Phase::Nacked { cleared: true } => {
                if let Some(txn) = self.current.take() {
                    self.transactions.push(txn);
                }
                self.phase = Phase::Stopping(self.latency);
            }
            // transfer abandoned mid-way, the device discards it
            Phase::Addressing { .. }
            | Phase::Addressed { .. }
            | Phase::Shifting(_)
            | Phase::Reading
            | Phase::Receiving(_) => {
                self.current = None;
                self.phase = Phase::Stopping(self.latency);
            }
            p => panic!("stop requested in {:?}", p),
        }
    }

    fn stop_pending(&mut self) -> bool {
        match self.phase {
            Phase::Stopping(0) => {
                self.phase = Phase::Idle;
                false
            }
            Phase::Stopping(n) => {
                self.phase = Phase::Stopping(n - 1);
                true
            }
            _ => false,
        }
    }
}
