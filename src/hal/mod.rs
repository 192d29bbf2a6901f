// src/hal/mod.rs

//! Ready-made [`BusTransport`](crate::BusTransport) and [`Clock`](crate::Clock)
//! implementations.

#[cfg(feature = "impl-generic-hal")]
mod generic;
#[cfg(feature = "std")]
mod std_clock;

#[cfg(feature = "impl-generic-hal")]
pub use generic::{DelayClock, I2cTransport, TickInstant};
#[cfg(feature = "std")]
pub use std_clock::StdClock;
