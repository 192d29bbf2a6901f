// src/sensors/lps331ap.rs

//! STMicroelectronics LPS331AP barometer.
//!
//! Used in one-shot mode: each conversion is started by setting
//! ONE_SHOT in CTRL_REG2 and is complete once the part clears that bit
//! again. One conversion produces both pressure and temperature. The
//! T_DA / P_DA flags in STATUS_REG are not used: they only clear when the
//! output registers are read, so they can still be set from an earlier
//! conversion. Output registers are little endian; temperature is
//! two's complement.

use super::cache::{Measurement, MeasurementCache};
use crate::common::{convert, timing, BitLevel, BusTransport, Clock, DriverError, Quantity};
use crate::engine::{
    Channel, Checksum, DataRead, EngineSettings, IdentityCheck, InitStep, ProtocolEngine, ReadyCheck, SensorProfile,
};
use core::time::Duration;
use log::debug;

/// Register map (datasheet section 7).
pub mod registers {
    use crate::common::Register;

    pub const WHO_AM_I: Register = Register::new("WHO_AM_I", 0x0F);
    pub const RES_CONF: Register = Register::new("RES_CONF", 0x10);
    pub const CTRL_REG1: Register = Register::new("CTRL_REG1", 0x20);
    pub const CTRL_REG2: Register = Register::new("CTRL_REG2", 0x21);
    pub const STATUS_REG: Register = Register::new("STATUS_REG", 0x27);

    pub const PRESS_OUT_XL: u8 = 0x28;
    pub const PRESS_OUT_L: u8 = 0x29;
    pub const PRESS_OUT_H: u8 = 0x2A;
    pub const TEMP_OUT_L: u8 = 0x2B;
    pub const TEMP_OUT_H: u8 = 0x2C;

    // CTRL_REG2 bits
    pub const BOOT: u8 = 0x80;
    pub const SWRESET: u8 = 0x04;
    pub const ONE_SHOT: u8 = 0x01;

    // STATUS_REG bits
    pub const P_DA: u8 = 0x02;
    pub const T_DA: u8 = 0x01;

    // CTRL_REG1 values
    pub const POWER_DOWN: u8 = 0x00;
    /// Active mode, one-shot output data rate, block data update off.
    pub const POWER_UP_ONE_SHOT: u8 = 0x84;

    /// RES_CONF: highest averaging for pressure and temperature.
    pub const HIGHEST_PRECISION: u8 = 0x7A;

    /// Expected WHO_AM_I value.
    pub const DEVICE_ID: u8 = 0xBB;
}

use registers as reg;

/// 7-bit address with SDO/SA0 tied to ground.
pub const I2C_ADDRESS: u8 = 0x5C;

/// 7-bit address with SDO/SA0 tied to VDD.
pub const I2C_ADDRESS_ALT: u8 = 0x5D;

/// ONE_SHOT self-clears when the conversion has finished.
const CONVERSION_DONE: ReadyCheck = ReadyCheck::Register {
    register: reg::CTRL_REG2.with_mask(reg::ONE_SHOT),
    level: BitLevel::Clear,
    interval: timing::LPS331AP_ONE_SHOT_CONVERSION,
};

static CHANNELS: [Channel; 2] = [
    Channel {
        quantity: Quantity::Pressure,
        trigger: &[reg::CTRL_REG2.address, reg::ONE_SHOT],
        ready: CONVERSION_DONE,
        data: DataRead::PerRegister(&[reg::PRESS_OUT_XL, reg::PRESS_OUT_L, reg::PRESS_OUT_H]),
        checksum: Checksum::None,
        convert: convert::lps331ap_pressure,
    },
    Channel {
        quantity: Quantity::Temperature,
        trigger: &[reg::CTRL_REG2.address, reg::ONE_SHOT],
        ready: CONVERSION_DONE,
        data: DataRead::PerRegister(&[reg::TEMP_OUT_L, reg::TEMP_OUT_H]),
        checksum: Checksum::None,
        convert: convert::lps331ap_temperature,
    },
];

pub static PROFILE: SensorProfile = SensorProfile {
    name: "LPS331AP",
    addresses: &[I2C_ADDRESS, I2C_ADDRESS_ALT],
    identity: Some(IdentityCheck {
        register: reg::WHO_AM_I,
        expected: reg::DEVICE_ID,
    }),
    init_sequence: &[
        // Reboot memory content + software reset, wait for BOOT to self-clear
        InitStep::Write(&[reg::CTRL_REG2.address, reg::BOOT | reg::SWRESET]),
        InitStep::WaitUntil(ReadyCheck::Register {
            register: reg::CTRL_REG2.with_mask(reg::BOOT),
            level: BitLevel::Clear,
            interval: timing::LPS331AP_BOOT_POLL_INTERVAL,
        }),
        // Resolution can only be changed while powered down
        InitStep::Write(&[reg::CTRL_REG1.address, reg::POWER_DOWN]),
        InitStep::Write(&[reg::RES_CONF.address, reg::HIGHEST_PRECISION]),
        InitStep::Write(&[reg::CTRL_REG1.address, reg::POWER_UP_ONE_SHOT]),
    ],
    channels: &CHANNELS,
};

/// LPS331AP driver with a per-cycle measurement cache.
///
/// `read_temperature` and `read_pressure` always start a new conversion
/// and drop every cached value first. `read_altitude` is derived from the
/// cached pressure and only touches the bus when no pressure is cached.
#[derive(Debug)]
pub struct Lps331ap<T, C>
where
    T: BusTransport,
    C: Clock,
{
    engine: ProtocolEngine<T, C>,
    cache: MeasurementCache,
}

impl<T, C> Lps331ap<T, C>
where
    T: BusTransport,
    C: Clock,
{
    /// Checks WHO_AM_I, resets the part and configures highest precision one-shot mode.
    pub fn new(transport: T, clock: C) -> Result<Self, DriverError<T::Error>> {
        Self::new_with_settings(transport, clock, EngineSettings::default())
    }

    pub fn new_with_settings(transport: T, clock: C, settings: EngineSettings) -> Result<Self, DriverError<T::Error>> {
        Ok(Lps331ap {
            engine: ProtocolEngine::new(transport, clock, &PROFILE, settings)?,
            cache: MeasurementCache::new(),
        })
    }

    /// Temperature in °C from a fresh one-shot conversion.
    pub fn read_temperature(&mut self) -> Result<f32, DriverError<T::Error>> {
        self.fresh(Quantity::Temperature, None)
    }

    pub fn read_temperature_with_timeout(&mut self, timeout: Duration) -> Result<f32, DriverError<T::Error>> {
        self.fresh(Quantity::Temperature, Some(timeout))
    }

    /// Pressure in hPa from a fresh one-shot conversion.
    pub fn read_pressure(&mut self) -> Result<f32, DriverError<T::Error>> {
        self.fresh(Quantity::Pressure, None)
    }

    pub fn read_pressure_with_timeout(&mut self, timeout: Duration) -> Result<f32, DriverError<T::Error>> {
        self.fresh(Quantity::Pressure, Some(timeout))
    }

    /// Approximate altitude in metres derived from the last pressure reading.
    ///
    /// Reads the pressure first if none is cached. WARNING: only an
    /// approximation against a fixed 1013.25 hPa sea-level reference.
    pub fn read_altitude(&mut self) -> Result<f32, DriverError<T::Error>> {
        if let Some(altitude) = self.cache.altitude {
            return Ok(altitude);
        }
        let pressure = match self.cache.pressure {
            Some(pressure) => pressure,
            None => self.read_pressure()?,
        };
        let altitude = convert::altitude_from_pressure(pressure);
        self.cache.altitude = Some(altitude);
        Ok(altitude)
    }

    /// Temperature and pressure from a single fresh conversion, plus the derived altitude.
    pub fn measure(&mut self) -> Result<Measurement, DriverError<T::Error>> {
        self.cache.invalidate();
        self.engine.trigger(Quantity::Pressure)?;
        let temperature = self.fetch(Quantity::Temperature)?;
        let pressure = self.fetch(Quantity::Pressure)?;
        let altitude = self.read_altitude()?;
        Ok(Measurement {
            temperature,
            pressure,
            altitude,
        })
    }

    /// Last temperature of the current cycle, without touching the bus.
    pub fn cached_temperature(&self) -> Option<f32> {
        self.cache.get(Quantity::Temperature)
    }

    pub fn cached_pressure(&self) -> Option<f32> {
        self.cache.get(Quantity::Pressure)
    }

    pub fn cached_altitude(&self) -> Option<f32> {
        self.cache.altitude
    }

    /// Drops every cached value.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn engine(&self) -> &ProtocolEngine<T, C> {
        &self.engine
    }

    /// Tears the driver down and hands back the bus handle and clock.
    pub fn release(self) -> (T, C) {
        self.engine.release()
    }

    fn fresh(&mut self, quantity: Quantity, timeout: Option<Duration>) -> Result<f32, DriverError<T::Error>> {
        // Cleared before the trigger so a failed cycle leaves nothing stale behind
        self.cache.invalidate();
        let value = match timeout {
            Some(timeout) => self.engine.measure_with_timeout(quantity, timeout)?,
            None => self.engine.measure(quantity)?,
        };
        debug!("LPS331AP: {:?} = {}", quantity, value);
        self.cache.store(quantity, value);
        Ok(value)
    }

    /// Reads `quantity` from the conversion that just finished.
    fn fetch(&mut self, quantity: Quantity) -> Result<f32, DriverError<T::Error>> {
        let sample = self.engine.fetch(quantity)?;
        let value = self.engine.convert(&sample)?;
        self.cache.store(quantity, value);
        Ok(value)
    }
}
