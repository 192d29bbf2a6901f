// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod convert;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod register;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From crc.rs
pub use crc::{calculate_crc8, verify_trailing_crc8};

// From error.rs
pub use error::DriverError;

// From hal_traits.rs
pub use hal_traits::{BusTransport, Clock, ClockInstant};

// From register.rs
pub use register::{BitLevel, Register};

// From types.rs
pub use types::{ByteOrder, Quantity, RawSample, MAX_SAMPLE_LEN};

// Conversion functions stay namespaced (common::convert::*) to keep the
// per-sensor names readable at the call site.
pub use convert::altitude_from_pressure;
