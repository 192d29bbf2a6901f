// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time produced by a [`Clock`].
///
/// Blanket-implemented for anything that can be offset by a `Duration` and
/// subtracted into one, which covers `std::time::Instant` and simple
/// microsecond counters alike. The engine only ever subtracts instants;
/// `Add` may panic on overflow (it does for `std::time::Instant`).
pub trait ClockInstant:
    Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> ClockInstant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the time source and sleep used by the polling loops.
///
/// Injected into the engine so tests can run without real delays.
pub trait Clock {
    type Instant: ClockInstant;

    /// Current time.
    fn now(&self) -> Self::Instant;

    /// Block for at least `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// A bus connection bound to exactly one 7-bit device address.
///
/// Implementations perform raw transfers only: no register framing and no
/// combined write-then-read is assumed. The engine sequences register
/// address writes and reads itself.
pub trait BusTransport {
    /// Associated error type for bus failures.
    type Error: Debug;

    /// The 7-bit address this handle was bound to when it was opened.
    fn address(&self) -> u8;

    /// Writes `bytes` to the device in one transfer.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fills `buffer` with bytes read from the device in one transfer.
    ///
    /// Returns the number of bytes actually received.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: BusTransport + ?Sized> BusTransport for &mut T {
    type Error = T::Error;

    fn address(&self) -> u8 {
        (**self).address()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buffer)
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }

    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}
