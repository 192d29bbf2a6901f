// src/engine/mod.rs

pub mod profile;
pub mod settings;

#[cfg(test)]
pub(crate) mod mock;

pub use profile::{Channel, Checksum, DataRead, IdentityCheck, InitStep, ReadyCheck, SensorProfile};
pub use settings::EngineSettings;

use crate::common::{
    crc::verify_trailing_crc8, BusTransport, Clock, DriverError, Quantity, RawSample, MAX_SAMPLE_LEN,
};
use core::time::Duration;
use log::{debug, trace, warn};

/// Generic trigger → poll → read → validate state machine for one sensor.
///
/// Owns the bus handle exclusively; every call blocks until the cycle
/// completes, fails, or runs into the configured timeout.
#[derive(Debug)]
pub struct ProtocolEngine<T, C>
where
    T: BusTransport,
    C: Clock,
{
    transport: T,
    clock: C,
    profile: &'static SensorProfile,
    settings: EngineSettings,
}

impl<T, C> ProtocolEngine<T, C>
where
    T: BusTransport,
    C: Clock,
{
    /// Verifies the part's identity, then runs its reset/power sequence.
    ///
    /// The identity register is read before anything is written, so a
    /// misidentified or absent part is never configured.
    pub fn new(
        transport: T,
        clock: C,
        profile: &'static SensorProfile,
        settings: EngineSettings,
    ) -> Result<Self, DriverError<T::Error>> {
        let mut engine = ProtocolEngine {
            transport,
            clock,
            profile,
            settings,
        };
        let address = engine.transport.address();
        if !profile.accepts_address(address) {
            warn!("{}: {:#04x} is not one of its strap addresses {:02x?}", profile.name, address, profile.addresses);
        }
        engine.verify_identity()?;
        engine.run_init_sequence()?;
        debug!("{}@{:#04x}: ready", profile.name, address);
        Ok(engine)
    }

    #[inline]
    pub fn profile(&self) -> &'static SensorProfile {
        self.profile
    }

    #[inline]
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.settings.timeout = timeout;
    }

    /// Address the underlying handle is bound to.
    pub fn address(&self) -> u8 {
        self.transport.address()
    }

    /// Gives back the bus handle and clock.
    pub fn release(self) -> (T, C) {
        (self.transport, self.clock)
    }

    /// Runs one full measurement cycle for `quantity` with the configured timeout.
    pub fn acquire(&mut self, quantity: Quantity) -> Result<RawSample, DriverError<T::Error>> {
        self.acquire_with_timeout(quantity, self.settings.timeout)
    }

    /// Runs one full measurement cycle, bounding the ready wait by `timeout`.
    ///
    /// On a checksum mismatch the sample is discarded and
    /// `DriverError::ChecksumError` returned; the caller decides whether to retry.
    pub fn acquire_with_timeout(
        &mut self,
        quantity: Quantity,
        timeout: Duration,
    ) -> Result<RawSample, DriverError<T::Error>> {
        let channel = self.channel(quantity)?;
        self.start_conversion(channel, timeout)?;
        self.collect(channel)
    }

    /// Starts a conversion with `quantity`'s trigger and blocks until the part reports it done.
    ///
    /// For parts that convert several quantities per trigger: follow up with
    /// one [`fetch`](Self::fetch) per quantity to read them all from the same conversion.
    pub fn trigger(&mut self, quantity: Quantity) -> Result<(), DriverError<T::Error>> {
        self.trigger_with_timeout(quantity, self.settings.timeout)
    }

    pub fn trigger_with_timeout(&mut self, quantity: Quantity, timeout: Duration) -> Result<(), DriverError<T::Error>> {
        let channel = self.channel(quantity)?;
        self.start_conversion(channel, timeout)
    }

    /// Reads and validates `quantity` from the last finished conversion, without a new trigger.
    pub fn fetch(&mut self, quantity: Quantity) -> Result<RawSample, DriverError<T::Error>> {
        let channel = self.channel(quantity)?;
        self.collect(channel)
    }

    /// Converts a sample with the formula of the channel it came from.
    pub fn convert(&self, sample: &RawSample) -> Result<f32, DriverError<T::Error>> {
        let channel = self.channel(sample.quantity())?;
        Ok((channel.convert)(sample.bytes()))
    }

    /// `acquire` followed by `convert`.
    pub fn measure(&mut self, quantity: Quantity) -> Result<f32, DriverError<T::Error>> {
        let sample = self.acquire(quantity)?;
        self.convert(&sample)
    }

    /// `acquire_with_timeout` followed by `convert`.
    pub fn measure_with_timeout(
        &mut self,
        quantity: Quantity,
        timeout: Duration,
    ) -> Result<f32, DriverError<T::Error>> {
        let sample = self.acquire_with_timeout(quantity, timeout)?;
        self.convert(&sample)
    }

    /// Reads one register as two transport calls: address write, then a one-byte read.
    pub fn read_register(&mut self, address: u8) -> Result<u8, DriverError<T::Error>> {
        self.transport.write(&[address])?;
        let mut value = [0u8; 1];
        let got = self.transport.read(&mut value)?;
        if got != value.len() {
            return Err(DriverError::ShortRead { expected: 1, got });
        }
        Ok(value[0])
    }

    pub fn write_register(&mut self, address: u8, value: u8) -> Result<(), DriverError<T::Error>> {
        self.transport.write(&[address, value])?;
        Ok(())
    }

    // --- Construction helpers ---

    fn verify_identity(&mut self) -> Result<(), DriverError<T::Error>> {
        let Some(identity) = self.profile.identity else {
            return Ok(());
        };
        let found = identity.register.field(self.read_register(identity.register.address)?);
        if found != identity.expected {
            warn!(
                "{}: {} reads {:#04x}, expected {:#04x}",
                self.profile.name, identity.register.name, found, identity.expected
            );
            return Err(DriverError::UnexpectedDevice {
                expected: identity.expected,
                found,
            });
        }
        Ok(())
    }

    fn run_init_sequence(&mut self) -> Result<(), DriverError<T::Error>> {
        let timeout = self.settings.timeout;
        for step in self.profile.init_sequence {
            trace!("{}: init {:?}", self.profile.name, step);
            match step {
                InitStep::Write(bytes) => self.transport.write(bytes)?,
                InitStep::Delay(duration) => self.clock.sleep(*duration),
                InitStep::WaitUntil(check) => self.wait_until_ready(check, timeout)?,
            }
        }
        Ok(())
    }

    // --- Cycle helpers ---

    fn start_conversion(&mut self, channel: &Channel, timeout: Duration) -> Result<(), DriverError<T::Error>> {
        // Nothing goes out on the bus unless the cycle can complete
        Self::check_capacity(&channel.data)?;
        self.check_fits_timeout(&channel.ready, timeout)?;

        debug!("{}: trigger {:?}", self.profile.name, channel.quantity);
        self.transport.write(channel.trigger)?;
        self.wait_until_ready(&channel.ready, timeout)
    }

    fn collect(&mut self, channel: &Channel) -> Result<RawSample, DriverError<T::Error>> {
        Self::check_capacity(&channel.data)?;
        let quantity = channel.quantity;
        let mut buffer = [0u8; MAX_SAMPLE_LEN];
        let raw = &mut buffer[..channel.data.wire_len()];
        self.read_data(&channel.data, raw)?;
        trace!("{}: raw {:?} = {:02x?}", self.profile.name, quantity, raw);

        let data: &[u8] = match channel.checksum {
            Checksum::None => raw,
            Checksum::TrailingCrc8 => verify_trailing_crc8(raw).inspect_err(|e| {
                warn!("{}: discarding {:?} sample: {}", self.profile.name, quantity, e);
            })?,
        };

        RawSample::new(quantity, data).ok_or(DriverError::BufferOverflow {
            needed: data.len(),
            got: MAX_SAMPLE_LEN,
        })
    }

    fn check_capacity(read: &DataRead) -> Result<(), DriverError<T::Error>> {
        let needed = read.wire_len();
        if needed > MAX_SAMPLE_LEN {
            return Err(DriverError::BufferOverflow {
                needed,
                got: MAX_SAMPLE_LEN,
            });
        }
        Ok(())
    }

    /// A fixed wait longer than `timeout` could only end past the deadline.
    fn check_fits_timeout(&self, check: &ReadyCheck, timeout: Duration) -> Result<(), DriverError<T::Error>> {
        match *check {
            ReadyCheck::Elapsed(conversion) if conversion > timeout => {
                warn!("{}: conversion time {:?} exceeds timeout {:?}", self.profile.name, conversion, timeout);
                Err(DriverError::Timeout)
            }
            _ => Ok(()),
        }
    }

    fn channel(&self, quantity: Quantity) -> Result<&'static Channel, DriverError<T::Error>> {
        let profile = self.profile;
        profile
            .channel(quantity)
            .ok_or(DriverError::UnsupportedQuantity(quantity))
    }

    fn read_data(&mut self, read: &DataRead, buffer: &mut [u8]) -> Result<(), DriverError<T::Error>> {
        match *read {
            DataRead::Direct { .. } => self.read_exact(buffer),
            DataRead::Burst { start, .. } => {
                self.transport.write(&[start])?;
                self.read_exact(buffer)
            }
            DataRead::PerRegister(registers) => {
                for (slot, register) in buffer.iter_mut().zip(registers) {
                    *slot = self.read_register(*register)?;
                }
                Ok(())
            }
        }
    }

    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), DriverError<T::Error>> {
        let got = self.transport.read(buffer)?;
        if got < buffer.len() {
            return Err(DriverError::ShortRead { expected: buffer.len(), got });
        }
        Ok(())
    }

    fn wait_until_ready(&mut self, check: &ReadyCheck, timeout: Duration) -> Result<(), DriverError<T::Error>> {
        self.check_fits_timeout(check, timeout)?;
        match *check {
            ReadyCheck::Elapsed(conversion) => {
                self.clock.sleep(conversion);
                Ok(())
            }
            ReadyCheck::Register { register, level, interval } => {
                self.poll_until(timeout, interval, |engine| {
                    let status = engine.read_register(register.address)?;
                    trace!("{}: {} = {:#04x}", engine.profile.name, register.name, status);
                    Ok(level.is_reached(&register, status))
                })
            }
        }
    }

    /// Calls `ready` until it reports true, sleeping `interval` in between.
    ///
    /// Never sleeps past the deadline; the last check happens at or just
    /// after it, then the loop gives up with `DriverError::Timeout`. Only
    /// elapsed time is computed, so any `timeout` up to `Duration::MAX` is safe.
    fn poll_until<F>(&mut self, timeout: Duration, interval: Duration, mut ready: F) -> Result<(), DriverError<T::Error>>
    where
        F: FnMut(&mut Self) -> Result<bool, DriverError<T::Error>>,
    {
        let start = self.clock.now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if ready(self)? {
                trace!("{}: ready after {} poll(s)", self.profile.name, attempts);
                return Ok(());
            }

            let elapsed = self.clock.now() - start;
            if elapsed >= timeout {
                warn!("{}: not ready after {} poll(s) in {:?}", self.profile.name, attempts, timeout);
                return Err(DriverError::Timeout);
            }
            self.clock.sleep(interval.min(timeout - elapsed));
        }
    }
}

#[cfg(test)]
impl<T, C> ProtocolEngine<T, C>
where
    T: BusTransport,
    C: Clock,
{
    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }
}
