// src/common/types.rs

use arrayvec::ArrayVec;
use core::ops::Deref;

/// Largest raw sample any supported sensor produces (data bytes plus checksum).
pub const MAX_SAMPLE_LEN: usize = 4;

/// A physical quantity a sensor channel can measure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    /// Degrees Celsius.
    Temperature,
    /// Hectopascal (millibar).
    Pressure,
    /// Percent relative humidity.
    Humidity,
}

/// Order in which the bytes of a multi-byte field arrive on the bus.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    /// Most significant byte first.
    MsbFirst,
    /// Least significant byte first.
    LsbFirst,
}

/// Unprocessed bytes read for a single quantity, in bus order.
///
/// When the protocol carries a checksum it has already been verified and
/// stripped, so `bytes()` holds data bytes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    quantity: Quantity,
    bytes: ArrayVec<u8, MAX_SAMPLE_LEN>,
}

impl RawSample {
    /// Builds a sample from a byte slice.
    ///
    /// Returns `None` if the slice is longer than [`MAX_SAMPLE_LEN`].
    pub fn new(quantity: Quantity, bytes: &[u8]) -> Option<Self> {
        let bytes = ArrayVec::try_from(bytes).ok()?;
        Some(RawSample { quantity, bytes })
    }

    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for RawSample {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}
