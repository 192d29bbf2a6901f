// src/common/convert.rs

//! Pure conversions from raw register bytes to engineering units.
//!
//! Nothing in here touches the bus. Every constant is copied from the
//! relevant datasheet and must not be re-derived.

use super::types::ByteOrder;

/// Sea-level reference pressure for the barometric altitude approximation, hPa.
pub const SEA_LEVEL_PRESSURE_HPA: f32 = 1013.25;

/// SHT21 status bits live in the two least significant bits of a measurement word.
pub const SHT21_STATUS_BITS_MASK: u16 = 0xFFFC;

const FEET_PER_METRE: f32 = 3.280_839_895;

/// Assembles up to four bytes into an unsigned integer.
///
/// Only the first four bytes are considered.
pub fn assemble_unsigned(bytes: &[u8], order: ByteOrder) -> u32 {
    let bytes = &bytes[..bytes.len().min(4)];
    match order {
        ByteOrder::MsbFirst => bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
        ByteOrder::LsbFirst => bytes.iter().rev().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)),
    }
}

/// Assembles `bytes` into an integer and sign-extends it from `bytes.len() * 8` bits.
pub fn assemble_signed(bytes: &[u8], order: ByteOrder) -> i32 {
    let width = (bytes.len().min(4) * 8) as u32;
    let raw = assemble_unsigned(bytes, order);
    if width == 0 || width == 32 {
        return raw as i32;
    }
    let shift = 32 - width;
    ((raw << shift) as i32) >> shift
}

/// Clears the SHT21 status bits from a measurement word.
#[inline]
pub const fn strip_sht21_status_bits(raw: u16) -> u16 {
    raw & SHT21_STATUS_BITS_MASK
}

/// `bias + scale * raw / 2^bits`
#[inline]
pub fn linear_scale(raw: f32, bias: f32, scale: f32, bits: u32) -> f32 {
    bias + scale * raw / (1u64 << bits) as f32
}

/// SHT21 temperature word (MSB first, status bits present) to °C.
///
/// T = -46.85 + 175.72 * S_T / 2^16
pub fn sht21_temperature(bytes: &[u8]) -> f32 {
    let raw = strip_sht21_status_bits(assemble_unsigned(bytes, ByteOrder::MsbFirst) as u16);
    linear_scale(f32::from(raw), -46.85, 175.72, 16)
}

/// SHT21 humidity word (MSB first, status bits present) to %RH.
///
/// RH = -6 + 125 * S_RH / 2^16
pub fn sht21_humidity(bytes: &[u8]) -> f32 {
    let raw = strip_sht21_status_bits(assemble_unsigned(bytes, ByteOrder::MsbFirst) as u16);
    linear_scale(f32::from(raw), -6.0, 125.0, 16)
}

/// LPS331AP pressure (PRESS_OUT_XL, _L, _H) to hPa.
///
/// P = raw / 4096
pub fn lps331ap_pressure(bytes: &[u8]) -> f32 {
    let raw = assemble_unsigned(bytes, ByteOrder::LsbFirst);
    raw as f32 / 4096.0
}

/// LPS331AP temperature (TEMP_OUT_L, _H, two's complement) to °C.
///
/// T = 42.5 + raw / 480
pub fn lps331ap_temperature(bytes: &[u8]) -> f32 {
    let raw = assemble_signed(bytes, ByteOrder::LsbFirst);
    42.5 + raw as f32 / 480.0
}

/// Approximate altitude above sea level in metres for a pressure in hPa.
///
/// Uses the standard atmosphere fit in feet and converts the result.
/// Only an approximation: weather moves the real sea-level pressure.
pub fn altitude_from_pressure(pressure_hpa: f32) -> f32 {
    let altitude_ft = (1.0 - libm::powf(pressure_hpa / SEA_LEVEL_PRESSURE_HPA, 0.190_284)) * 145_366.45;
    altitude_ft / FEET_PER_METRE
}
