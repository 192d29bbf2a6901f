// src/common/register.rs

/// A named 8-bit register address, optionally with the bitmask of the field of interest.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    pub name: &'static str,
    pub address: u8,
    pub mask: u8,
}

impl Register {
    /// A register used as a whole byte.
    pub const fn new(name: &'static str, address: u8) -> Self {
        Register { name, address, mask: 0xFF }
    }

    /// A register whose interesting field is `mask`.
    pub const fn masked(name: &'static str, address: u8, mask: u8) -> Self {
        Register { name, address, mask }
    }

    /// The same register with a different field mask.
    pub const fn with_mask(self, mask: u8) -> Self {
        Register { mask, ..self }
    }

    #[inline]
    pub const fn field(&self, value: u8) -> u8 {
        value & self.mask
    }
}

/// Which state of a status field means "ready".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitLevel {
    /// Ready once any bit of the mask reads as 1 (data-available flags).
    Set,
    /// Ready once every bit of the mask reads as 0 (self-clearing command bits).
    Clear,
}

impl BitLevel {
    /// Tests a status byte against `register`'s mask.
    pub const fn is_reached(&self, register: &Register, value: u8) -> bool {
        match self {
            BitLevel::Set => register.field(value) != 0,
            BitLevel::Clear => register.field(value) == 0,
        }
    }
}
