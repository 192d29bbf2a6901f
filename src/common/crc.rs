// src/common/crc.rs

use super::error::DriverError;
use crc::{Algorithm, Crc, NoTable};

/// CRC-8 used by Sensirion humidity sensors (SHT2x family).
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1, i.e. 0x131 with the implicit top bit)
/// Initial Value: 0x00
/// Input Reflected: false (MSB first)
/// Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xA2 (for "123456789")
pub const SENSOR_CRC8: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xA2,
    residue: 0x00,
};

// Bitwise engine, no lookup table in flash
const CRC_COMPUTER: Crc<u8, NoTable> = Crc::<u8, NoTable>::new(&SENSOR_CRC8);

/// Calculates the CRC-8 over `data`, one bit at a time, most significant bit first.
#[inline]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Verifies a buffer whose last byte is the CRC-8 of the bytes before it.
///
/// Returns the data part on success.
///
/// * `Err(DriverError::ShortRead)` if the buffer has no room for a checksum.
/// * `Err(DriverError::ChecksumError)` if the CRCs don't match.
pub fn verify_trailing_crc8<E>(data_with_crc: &[u8]) -> Result<&[u8], DriverError<E>>
where
    E: core::fmt::Debug,
{
    let Some((&received, data)) = data_with_crc.split_last() else {
        return Err(DriverError::ShortRead { expected: 1, got: 0 });
    };

    let calculated = calculate_crc8(data);
    if calculated == received {
        Ok(data)
    } else {
        Err(DriverError::ChecksumError { expected: received, calculated })
    }
}
