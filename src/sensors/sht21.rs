// src/sensors/sht21.rs

//! Sensirion SHT21 humidity and temperature sensor.
//!
//! The SHT21 is command driven: there is no register file to poll. A
//! measurement is started with a "no hold master" command, the part is
//! given its worst-case conversion time, and then three bytes are read:
//! the 16-bit result (MSB first, status in the two LSBs) and a CRC-8.

use crate::common::{convert, timing, BusTransport, Clock, DriverError, Quantity};
use crate::engine::{Channel, Checksum, DataRead, EngineSettings, InitStep, ProtocolEngine, ReadyCheck, SensorProfile};
use core::time::Duration;

/// Command codes (datasheet table 6).
pub mod commands {
    pub const TRIGGER_TEMPERATURE_NO_HOLD: u8 = 0xF3;
    pub const TRIGGER_HUMIDITY_NO_HOLD: u8 = 0xF5;
    pub const SOFT_RESET: u8 = 0xFE;
}

/// Fixed 7-bit bus address.
pub const I2C_ADDRESS: u8 = 0x40;

static CHANNELS: [Channel; 2] = [
    Channel {
        quantity: Quantity::Temperature,
        trigger: &[commands::TRIGGER_TEMPERATURE_NO_HOLD],
        ready: ReadyCheck::Elapsed(timing::SHT21_TEMPERATURE_CONVERSION),
        data: DataRead::Direct { len: 3 },
        checksum: Checksum::TrailingCrc8,
        convert: convert::sht21_temperature,
    },
    Channel {
        quantity: Quantity::Humidity,
        trigger: &[commands::TRIGGER_HUMIDITY_NO_HOLD],
        ready: ReadyCheck::Elapsed(timing::SHT21_HUMIDITY_CONVERSION),
        data: DataRead::Direct { len: 3 },
        checksum: Checksum::TrailingCrc8,
        convert: convert::sht21_humidity,
    },
];

pub static PROFILE: SensorProfile = SensorProfile {
    name: "SHT21",
    addresses: &[I2C_ADDRESS],
    identity: None,
    init_sequence: &[
        InitStep::Write(&[commands::SOFT_RESET]),
        InitStep::Delay(timing::SHT21_SOFT_RESET_TIME),
    ],
    channels: &CHANNELS,
};

/// SHT21 driver. Releases the bus handle when dropped.
#[derive(Debug)]
pub struct Sht21<T, C>
where
    T: BusTransport,
    C: Clock,
{
    engine: ProtocolEngine<T, C>,
}

impl<T, C> Sht21<T, C>
where
    T: BusTransport,
    C: Clock,
{
    /// Soft-resets the part and waits for it to come back.
    pub fn new(transport: T, clock: C) -> Result<Self, DriverError<T::Error>> {
        Self::new_with_settings(transport, clock, EngineSettings::default())
    }

    pub fn new_with_settings(transport: T, clock: C, settings: EngineSettings) -> Result<Self, DriverError<T::Error>> {
        Ok(Sht21 {
            engine: ProtocolEngine::new(transport, clock, &PROFILE, settings)?,
        })
    }

    /// Temperature in °C from a fresh conversion.
    pub fn read_temperature(&mut self) -> Result<f32, DriverError<T::Error>> {
        self.engine.measure(Quantity::Temperature)
    }

    pub fn read_temperature_with_timeout(&mut self, timeout: Duration) -> Result<f32, DriverError<T::Error>> {
        self.engine.measure_with_timeout(Quantity::Temperature, timeout)
    }

    /// Relative humidity in %RH from a fresh conversion.
    pub fn read_humidity(&mut self) -> Result<f32, DriverError<T::Error>> {
        self.engine.measure(Quantity::Humidity)
    }

    pub fn read_humidity_with_timeout(&mut self, timeout: Duration) -> Result<f32, DriverError<T::Error>> {
        self.engine.measure_with_timeout(Quantity::Humidity, timeout)
    }

    pub fn engine(&self) -> &ProtocolEngine<T, C> {
        &self.engine
    }

    /// Tears the driver down and hands back the bus handle and clock.
    pub fn release(self) -> (T, C) {
        self.engine.release()
    }
}
