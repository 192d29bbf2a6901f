// src/common/error.rs

use super::types::Quantity;

#[derive(Debug, thiserror::Error)]
pub enum DriverError<E = ()>
where
    E: core::fmt::Debug, // Debug is enough for the transport error
{
    /// Underlying bus failure reported by the transport (NACK, busy, I/O error).
    #[error("transport error: {0:?}")]
    Transport(E),

    /// The identity register did not hold the value expected for this part.
    #[error("unexpected device: expected id {expected:#04x}, found {found:#04x}")]
    UnexpectedDevice { expected: u8, found: u8 },

    /// Trailing checksum byte does not match the CRC computed over the data bytes.
    #[error("checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumError { expected: u8, calculated: u8 },

    /// The ready condition was not observed before the deadline.
    #[error("timed out waiting for the sensor")]
    Timeout,

    /// The sensor profile has no channel for the requested quantity.
    #[error("quantity {0:?} is not supported by this sensor")]
    UnsupportedQuantity(Quantity),

    /// The transport returned fewer bytes than the raw sample needs.
    #[error("short read: needed {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    /// A channel reads more bytes than a raw sample can hold.
    #[error("buffer overflow: needed {needed} bytes, raw sample holds {got}")]
    BufferOverflow { needed: usize, got: usize },
}

// Lets `?` lift a bare transport error
impl<E: core::fmt::Debug> From<E> for DriverError<E> {
    fn from(e: E) -> Self {
        DriverError::Transport(e)
    }
}

impl<E: core::fmt::Debug> DriverError<E> {
    /// Whether repeating the acquisition can reasonably succeed.
    ///
    /// Checksum failures and timeouts are transient; identity and
    /// configuration errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DriverError::ChecksumError { .. } | DriverError::Timeout)
    }
}
