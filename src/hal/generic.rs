// src/hal/generic.rs

use crate::common::{BusTransport, Clock};
use core::ops::{Add, Sub};
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Binds an `embedded-hal` 1.0 I2C bus to one 7-bit device address.
///
/// Every transfer is a separate transaction; the engine never asks for a
/// repeated-start write-read.
#[derive(Debug)]
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cTransport<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        I2cTransport { i2c, address }
    }

    /// Hands the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> BusTransport for I2cTransport<I2C> {
    type Error = I2C::Error;

    fn address(&self) -> u8 {
        self.address
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, bytes)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(self.address, buffer)?;
        Ok(buffer.len())
    }
}

/// Microseconds slept through a [`DelayClock`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TickInstant(u64);

impl TickInstant {
    pub const fn as_micros(&self) -> u64 {
        self.0
    }
}

impl Add<Duration> for TickInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        TickInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl Sub<TickInstant> for TickInstant {
    type Output = Duration;
    fn sub(self, rhs: TickInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

/// A [`Clock`] for targets that only have a delay provider.
///
/// Time advances by what was slept, so bus transfer time is not counted
/// and a timeout bounds the total sleep rather than wall time.
#[derive(Debug)]
pub struct DelayClock<D> {
    delay: D,
    elapsed: TickInstant,
}

impl<D: DelayNs> DelayClock<D> {
    pub fn new(delay: D) -> Self {
        DelayClock {
            delay,
            elapsed: TickInstant::default(),
        }
    }

    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> Clock for DelayClock<D> {
    type Instant = TickInstant;

    fn now(&self) -> TickInstant {
        self.elapsed
    }

    fn sleep(&mut self, duration: Duration) {
        let us = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(us);
        self.elapsed = self.elapsed + Duration::from_micros(u64::from(us));
    }
}
