// src/engine/profile.rs

//! Static description of a sensor model.
//!
//! A profile is plain data: register addresses, masks, timing and the
//! conversion function for every channel. The engine interprets it; no
//! sensor gets its own copy of the polling state machine.

use crate::common::{BitLevel, Quantity, Register};
use core::time::Duration;

/// How the engine decides a conversion (or a reset) has finished.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ReadyCheck {
    /// Read `register` until its masked field reaches `level`, sleeping `interval` between reads.
    Register {
        register: Register,
        level: BitLevel,
        interval: Duration,
    },
    /// The part has no status register: wait a fixed worst-case time.
    Elapsed(Duration),
}

/// How the raw data bytes of a channel are fetched once the sensor is ready.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataRead {
    /// A single read of `len` bytes, no register address (command-driven parts).
    Direct { len: usize },
    /// Write `start`, then read `len` bytes in one transfer (auto-incrementing register file).
    Burst { start: u8, len: usize },
    /// One address write + one-byte read per register, in the given order.
    PerRegister(&'static [u8]),
}

impl DataRead {
    /// Number of bytes this read produces on the wire.
    pub const fn wire_len(&self) -> usize {
        match self {
            DataRead::Direct { len } | DataRead::Burst { len, .. } => *len,
            DataRead::PerRegister(registers) => registers.len(),
        }
    }
}

/// Integrity check applied to the bytes read for a channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Checksum {
    None,
    /// Last byte is the CRC-8 (poly 0x131) of the bytes before it.
    TrailingCrc8,
}

/// Everything the engine needs to produce one quantity.
#[derive(Debug, Copy, Clone)]
pub struct Channel {
    pub quantity: Quantity,
    /// Bytes written to start a conversion (command byte, or register address + value).
    pub trigger: &'static [u8],
    pub ready: ReadyCheck,
    pub data: DataRead,
    pub checksum: Checksum,
    /// Converts the (checksum-stripped) data bytes into the engineering unit.
    pub convert: fn(&[u8]) -> f32,
}

/// Identity register check run before anything is written to the part.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IdentityCheck {
    pub register: Register,
    pub expected: u8,
}

/// One step of a construction-time reset / power sequence.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InitStep {
    /// Raw bytes written as-is.
    Write(&'static [u8]),
    /// Unconditional settle time.
    Delay(Duration),
    /// Block until the condition holds (bounded by the engine timeout).
    WaitUntil(ReadyCheck),
}

/// Complete description of a sensor model.
#[derive(Debug)]
pub struct SensorProfile {
    pub name: &'static str,
    /// 7-bit I2C addresses the part can be strapped to, factory default first.
    pub addresses: &'static [u8],
    pub identity: Option<IdentityCheck>,
    pub init_sequence: &'static [InitStep],
    pub channels: &'static [Channel],
}

impl SensorProfile {
    /// Channel producing `quantity`, if the model has one.
    pub fn channel(&self, quantity: Quantity) -> Option<&Channel> {
        self.channels.iter().find(|c| c.quantity == quantity)
    }

    pub fn supports(&self, quantity: Quantity) -> bool {
        self.channel(quantity).is_some()
    }

    /// Whether the part can answer at `address`. An empty list accepts any address.
    pub fn accepts_address(&self, address: u8) -> bool {
        self.addresses.is_empty() || self.addresses.contains(&address)
    }
}
