// src/engine/mock.rs

// Test doubles shared by the engine and facade unit tests.

use crate::common::{BusTransport, Clock};
use core::time::Duration;

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);
impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    // Panics on overflow like std::time::Instant
    fn add(self, rhs: Duration) -> Self {
        let us = u64::try_from(rhs.as_micros()).expect("duration overflows mock instant");
        MockInstant(self.0.checked_add(us).expect("overflow when adding duration to mock instant"))
    }
}
impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Clock ---
#[derive(Debug, Default, Clone)]
pub(crate) struct MockClock {
    pub current_time_us: u64,
    pub sleep_calls: u32,
}
impl Clock for MockClock {
    type Instant = MockInstant;
    fn now(&self) -> MockInstant {
        MockInstant(self.current_time_us)
    }
    fn sleep(&mut self, duration: Duration) {
        self.sleep_calls += 1;
        self.current_time_us = self.current_time_us.saturating_add(duration.as_micros() as u64);
    }
}

// --- Mock Bus Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockBusError;

/// Scripted status change: after `after_reads` reads of `register`, it takes `value`.
#[derive(Debug, Copy, Clone)]
pub(crate) struct StatusScript {
    pub register: u8,
    pub value: u8,
    pub after_reads: u32,
}

// --- Mock register-file device ---
//
// A write sets the register pointer from its first byte and stores any
// following bytes at auto-incrementing addresses. Reads come from the
// staged queue first (command-driven parts), then from the register file.
#[derive(Debug, Clone)]
pub(crate) struct MockBus {
    pub address: u8,
    pub registers: [u8; 256],
    pointer: u8,
    staged: [Option<u8>; 16],
    staged_pos: usize,
    pub write_log: [Option<[u8; 2]>; 64],
    pub write_pos: usize,
    pub register_reads: [u32; 256],
    pub status_script: Option<StatusScript>,
    pub fail_reads: bool,
    pub short_reads: bool,
}

impl MockBus {
    pub fn new(address: u8) -> Self {
        MockBus {
            address,
            registers: [0; 256],
            pointer: 0,
            staged: [None; 16],
            staged_pos: 0,
            write_log: [None; 64],
            write_pos: 0,
            register_reads: [0; 256],
            status_script: None,
            fail_reads: false,
            short_reads: false,
        }
    }

    pub fn stage_read_data(&mut self, data: &[u8]) {
        self.staged = [None; 16];
        self.staged_pos = 0;
        assert!(data.len() <= self.staged.len());
        for (i, byte) in data.iter().enumerate() {
            self.staged[i] = Some(*byte);
        }
    }

    /// First one or two bytes of each logged write, in order.
    pub fn writes(&self) -> impl Iterator<Item = [u8; 2]> + '_ {
        self.write_log[..self.write_pos].iter().flatten().copied()
    }

    pub fn was_written(&self, bytes: [u8; 2]) -> bool {
        self.writes().any(|w| w == bytes)
    }
}

impl BusTransport for MockBus {
    type Error = MockBusError;

    fn address(&self) -> u8 {
        self.address
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), MockBusError> {
        let Some((&first, rest)) = bytes.split_first() else {
            return Ok(());
        };
        if self.write_pos < self.write_log.len() {
            self.write_log[self.write_pos] = Some([first, rest.first().copied().unwrap_or(0)]);
            self.write_pos += 1;
        }
        self.pointer = first;
        for byte in rest {
            self.registers[self.pointer as usize] = *byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, MockBusError> {
        if self.fail_reads {
            return Err(MockBusError);
        }
        if self.short_reads {
            return Ok(0);
        }
        for slot in buffer.iter_mut() {
            if let Some(Some(byte)) = self.staged.get(self.staged_pos) {
                *slot = *byte;
                self.staged_pos += 1;
                continue;
            }
            let register = self.pointer as usize;
            self.register_reads[register] += 1;
            if let Some(script) = self.status_script {
                if script.register as usize == register && self.register_reads[register] > script.after_reads {
                    self.registers[register] = script.value;
                }
            }
            *slot = self.registers[register];
            self.pointer = self.pointer.wrapping_add(1);
        }
        Ok(buffer.len())
    }
}
