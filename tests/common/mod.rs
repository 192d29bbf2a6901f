// tests/common/mod.rs

#![allow(dead_code)]

use envsense::{BusTransport, Clock};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SimBusError;

/// Register-file device simulator.
///
/// The first byte of a write selects a register, following bytes are
/// stored at auto-incrementing addresses. A read first consumes a queued
/// command response, then a queued per-register value, then falls back
/// to the register file.
#[derive(Debug, Default)]
pub struct SimBus {
    pub address: u8,
    pub registers: HashMap<u8, u8>,
    pub scripted: HashMap<u8, VecDeque<u8>>,
    pub responses: VecDeque<Vec<u8>>,
    pub writes: Vec<Vec<u8>>,
    pub reads: HashMap<u8, u32>,
    pub self_clearing: HashMap<u8, u8>,
    pointer: u8,
}

impl SimBus {
    pub fn new(address: u8) -> Self {
        SimBus {
            address,
            ..Default::default()
        }
    }

    pub fn set(&mut self, register: u8, value: u8) -> &mut Self {
        self.registers.insert(register, value);
        self
    }

    /// Values returned by the next reads of `register`, before the register file is used.
    pub fn script(&mut self, register: u8, values: &[u8]) -> &mut Self {
        self.scripted.entry(register).or_default().extend(values.iter().copied());
        self
    }

    /// Bits of `register` that clear in the register file once they have been read.
    pub fn self_clearing(&mut self, register: u8, mask: u8) -> &mut Self {
        self.self_clearing.insert(register, mask);
        self
    }

    pub fn respond(&mut self, bytes: &[u8]) -> &mut Self {
        self.responses.push_back(bytes.to_vec());
        self
    }

    pub fn reads_of(&self, register: u8) -> u32 {
        self.reads.get(&register).copied().unwrap_or(0)
    }

    pub fn wrote(&self, bytes: &[u8]) -> bool {
        self.writes.iter().any(|w| w.as_slice() == bytes)
    }
}

impl BusTransport for SimBus {
    type Error = SimBusError;

    fn address(&self) -> u8 {
        self.address
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SimBusError> {
        self.writes.push(bytes.to_vec());
        if let Some((&first, rest)) = bytes.split_first() {
            self.pointer = first;
            for byte in rest {
                self.registers.insert(self.pointer, *byte);
                self.pointer = self.pointer.wrapping_add(1);
            }
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, SimBusError> {
        if let Some(response) = self.responses.pop_front() {
            let n = response.len().min(buffer.len());
            buffer[..n].copy_from_slice(&response[..n]);
            return Ok(n);
        }
        for slot in buffer.iter_mut() {
            *self.reads.entry(self.pointer).or_insert(0) += 1;
            let scripted = self.scripted.get_mut(&self.pointer).and_then(VecDeque::pop_front);
            *slot = scripted.unwrap_or_else(|| self.registers.get(&self.pointer).copied().unwrap_or(0));
            if let Some(mask) = self.self_clearing.get(&self.pointer) {
                if let Some(value) = self.registers.get_mut(&self.pointer) {
                    *value &= !mask;
                }
            }
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(buffer.len())
    }
}

/// LPS331AP one-shot model that follows the datasheet flag rules.
///
/// Setting ONE_SHOT starts a conversion that completes on the
/// `busy_reads`-th byte read afterwards, whatever register it targets.
/// Conversion `n` outputs `1000 + n` hPa and a raw temperature of `n`,
/// then sets P_DA and T_DA. ONE_SHOT self-clears on completion; the DA
/// flags clear only when PRESS_OUT_H / TEMP_OUT_H is read.
#[derive(Debug)]
pub struct Lps331apSim {
    pub registers: [u8; 256],
    pub busy_reads: u32,
    pub triggers: u32,
    pub conversions_completed: u32,
    pending: Option<u32>,
    pointer: u8,
}

impl Lps331apSim {
    const CTRL_REG2: u8 = 0x21;
    const STATUS_REG: u8 = 0x27;
    const PRESS_OUT_H: u8 = 0x2A;
    const TEMP_OUT_H: u8 = 0x2C;
    const ONE_SHOT: u8 = 0x01;
    const P_DA: u8 = 0x02;
    const T_DA: u8 = 0x01;

    pub fn new() -> Self {
        let mut registers = [0; 256];
        registers[0x0F] = 0xBB;
        Lps331apSim {
            registers,
            busy_reads: 2,
            triggers: 0,
            conversions_completed: 0,
            pending: None,
            pointer: 0,
        }
    }

    fn complete_conversion(&mut self) {
        self.conversions_completed += 1;
        let n = self.conversions_completed;
        let pressure = (1000 + n) * 4096;
        self.registers[0x28..=0x2A].copy_from_slice(&pressure.to_le_bytes()[..3]);
        self.registers[0x2B..=0x2C].copy_from_slice(&(n as i16).to_le_bytes());
        self.registers[Self::STATUS_REG as usize] |= Self::P_DA | Self::T_DA;
        self.registers[Self::CTRL_REG2 as usize] &= !Self::ONE_SHOT;
    }
}

impl BusTransport for Lps331apSim {
    type Error = SimBusError;

    fn address(&self) -> u8 {
        0x5C
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SimBusError> {
        let Some((&first, rest)) = bytes.split_first() else {
            return Ok(());
        };
        self.pointer = first;
        for &byte in rest {
            let mut value = byte;
            if self.pointer == Self::CTRL_REG2 {
                // BOOT and SWRESET finish instantly
                value &= !0x84;
                if value & Self::ONE_SHOT != 0 {
                    self.triggers += 1;
                    self.pending = Some(self.busy_reads);
                }
            }
            self.registers[self.pointer as usize] = value;
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, SimBusError> {
        for slot in buffer.iter_mut() {
            if let Some(left) = self.pending {
                if left <= 1 {
                    self.pending = None;
                    self.complete_conversion();
                } else {
                    self.pending = Some(left - 1);
                }
            }
            *slot = self.registers[self.pointer as usize];
            match self.pointer {
                Self::PRESS_OUT_H => self.registers[Self::STATUS_REG as usize] &= !Self::P_DA,
                Self::TEMP_OUT_H => self.registers[Self::STATUS_REG as usize] &= !Self::T_DA,
                _ => {}
            }
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(buffer.len())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimInstant(pub u64);

impl std::ops::Add<Duration> for SimInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        SimInstant(self.0 + rhs.as_micros() as u64)
    }
}

impl std::ops::Sub<SimInstant> for SimInstant {
    type Output = Duration;
    fn sub(self, rhs: SimInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

/// Simulated clock: sleeping advances time instantly.
#[derive(Debug, Default)]
pub struct SimClock {
    pub now_us: u64,
    pub sleeps: Vec<Duration>,
}

impl SimClock {
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.now_us)
    }
}

impl Clock for SimClock {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(self.now_us)
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.now_us += duration.as_micros() as u64;
    }
}
