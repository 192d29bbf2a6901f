// src/sensors/cache.rs

use crate::common::Quantity;

/// One complete barometer reading.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// °C
    pub temperature: f32,
    /// hPa
    pub pressure: f32,
    /// Metres above sea level, approximate.
    pub altitude: f32,
}

/// Barometer values of the current conversion cycle.
///
/// Every entry belongs to the same cycle; starting a new one clears all of them.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub(crate) struct MeasurementCache {
    pub temperature: Option<f32>,
    pub pressure: Option<f32>,
    pub altitude: Option<f32>,
}

impl MeasurementCache {
    pub const fn new() -> Self {
        MeasurementCache {
            temperature: None,
            pressure: None,
            altitude: None,
        }
    }

    pub fn invalidate(&mut self) {
        *self = Self::new();
    }

    /// Humidity is not produced by the barometer and is never kept.
    pub fn store(&mut self, quantity: Quantity, value: f32) {
        match quantity {
            Quantity::Temperature => self.temperature = Some(value),
            Quantity::Pressure => self.pressure = Some(value),
            Quantity::Humidity => {}
        }
    }

    pub fn get(&self, quantity: Quantity) -> Option<f32> {
        match quantity {
            Quantity::Temperature => self.temperature,
            Quantity::Pressure => self.pressure,
            Quantity::Humidity => None,
        }
    }
}
