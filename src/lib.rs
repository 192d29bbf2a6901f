// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless testing or std is requested

pub mod common;
pub mod engine;
pub mod sensors;

#[cfg(any(feature = "impl-generic-hal", feature = "std"))]
pub mod hal;

// Re-export key types for convenience
pub use common::{BusTransport, Clock, DriverError, Quantity, RawSample};
pub use engine::{EngineSettings, ProtocolEngine, SensorProfile};
pub use sensors::{Lps331ap, Measurement, Sht21};
