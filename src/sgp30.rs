// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

use crate::command::{Command, Frame, MAX_REPLY_LEN, MAX_REPLY_WORDS, WORD_LEN};
use crate::config::{Config, DEFAULT_BUS_PATH};
use crate::crc::{crc8, verify_word};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::{Delay, I2cdev};
use log::{debug, error, trace, warn};
use std::error::Error;
use std::fmt;

/// Largest absolute humidity accepted by `set_humidity`, in mg/m3
pub const MAX_ABSOLUTE_HUMIDITY: u32 = 256_000;

///
///SGP30 error enum. I2c wraps the error of the
///bus when a write or read fails.
///Checksum when a crc 8 checksum does not correspond
///with the calculated one. The remaining variants
///are rejected inputs or an unexpected device.
///
#[derive(Debug)]
pub enum Sgp30Error<E> {
    /// Write or read on the I2C bus failed
    I2c(E),
    /// A reply word carried a checksum different from the calculated one
    Checksum {
        /// Index of the offending word in the reply
        word: usize,
        /// Checksum calculated over the received data bytes
        calculated: u8,
        /// Checksum byte sent by the device
        received: u8,
    },
    /// The device answered with a feature set of another product family
    FeatureSet(u16),
    /// Absolute humidity above `MAX_ABSOLUTE_HUMIDITY`
    HumidityOutOfRange(u32),
    /// Parameter or reply slots do not match what the command expects
    InvalidArgument,
}

///Implementation of display for Sgp30Error
impl<E: fmt::Debug> fmt::Display for Sgp30Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Sgp30Error::I2c(ref e) => write!(f, "Communication error with device: {:?}", e),
            Sgp30Error::Checksum {
                word,
                calculated,
                received,
            } => write!(
                f,
                "Checksum Error found in word {}: calculated 0x{:02X}, received 0x{:02X}",
                word, calculated, received
            ),
            Sgp30Error::FeatureSet(fs) => {
                write!(f, "Unexpected feature set 0x{:04X}, device is not an SGP30", fs)
            }
            Sgp30Error::HumidityOutOfRange(ah) => write!(
                f,
                "Absolute humidity {} out of range (max {})",
                ah, MAX_ABSOLUTE_HUMIDITY
            ),
            Sgp30Error::InvalidArgument => {
                fmt::Display::fmt("Wrong number of parameters or reply words for command", f)
            }
        }
    }
}

///Implementation for Error to Sgp30Error
impl<E: fmt::Debug> Error for Sgp30Error<E> {}

/// Driver life cycle. Only a complete `begin` moves it to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Ready,
}

/// Baseline values of the air quality algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Baseline {
    pub eco2: u16,
    pub tvoc: u16,
}

/// SGP30 Struct, owns the I2C bus and delay it talks through
/// and keeps the last values read from the sensor.
///
pub struct Sgp30<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Config,
    state: State,
    serial_number: u64,
    eco2: u16,
    tvoc: u16,
    raw_h2: u16,
    raw_ethanol: u16,
}

impl Sgp30<I2cdev, Delay> {
    /// Create a new SGP30 Struct on `/dev/i2c-1`
    ///
    /// Uses the standard address 0x58.
    /// If fails, return an LinuxI2CError from i2cdev
    ///
    pub fn open_linux() -> Result<Self, LinuxI2CError> {
        Self::open_linux_path(DEFAULT_BUS_PATH, Config::default())
    }

    /// Create a new SGP30 Struct on the given i2c-dev path and config
    pub fn open_linux_path(path: &str, config: Config) -> Result<Self, LinuxI2CError> {
        let device = I2cdev::new(path)?;
        Ok(Sgp30::with_config(device, Delay, config))
    }
}

/// Implementation of SGP30 related
/// operations
///
impl<I2C, D> Sgp30<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Driver with the default address and product family.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, Config::default())
    }

    pub fn with_config(i2c: I2C, delay: D, config: Config) -> Self {
        Sgp30 {
            i2c,
            delay,
            config,
            state: State::Uninitialized,
            serial_number: 0,
            eco2: 0,
            tvoc: 0,
            raw_h2: 0,
            raw_ethanol: 0,
        }
    }

    /// Gives back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// 48 bit serial number read by the last successful `begin`
    pub fn serial_number(&self) -> u64 {
        self.serial_number
    }

    /// Equivalent CO2 in ppm from the last successful `measure`
    pub fn eco2(&self) -> u16 {
        self.eco2
    }

    /// Total VOC in ppb from the last successful `measure`
    pub fn tvoc(&self) -> u16 {
        self.tvoc
    }

    /// Raw H2 signal from the last successful `measure_raw`
    pub fn raw_h2(&self) -> u16 {
        self.raw_h2
    }

    /// Raw ethanol signal from the last successful `measure_raw`
    pub fn raw_ethanol(&self) -> u16 {
        self.raw_ethanol
    }

    /// Sends `command` with its `params`, waits for the device and reads
    /// back `words.len()` checksummed words into `words`.
    ///
    /// `words` is only written when every word of the reply has a valid
    /// checksum. The first bad word aborts the whole transaction.
    pub fn execute(
        &mut self,
        command: Command,
        params: &[u16],
        words: &mut [u16],
    ) -> Result<(), Sgp30Error<I2C::Error>> {
        if words.len() != command.reply_words() {
            return Err(Sgp30Error::InvalidArgument);
        }
        let frame = Frame::new(command, params).ok_or(Sgp30Error::InvalidArgument)?;

        debug!("Executing {:?}: {:02X?}", command, frame.as_bytes());
        self.i2c
            .write(self.config.address, frame.as_bytes())
            .map_err(Sgp30Error::I2c)?;

        self.delay.delay_ms(command.delay_ms());

        if words.is_empty() {
            return Ok(());
        }

        let reply_len = words.len() * WORD_LEN;
        let mut reply = [0u8; MAX_REPLY_LEN];
        self.i2c
            .read(self.config.address, &mut reply[..reply_len])
            .map_err(Sgp30Error::I2c)?;

        let mut decoded = [0u16; MAX_REPLY_WORDS];
        for (i, chunk) in reply[..reply_len].chunks_exact(WORD_LEN).enumerate() {
            trace!("CRC calced: 0x{:02X} vs. 0x{:02X}", crc8(&chunk[..2]), chunk[2]);
            if !verify_word(chunk) {
                error!(
                    "Bad checksum in word {} of {:?} reply: {:02X?}",
                    i,
                    command,
                    &reply[..reply_len]
                );
                return Err(Sgp30Error::Checksum {
                    word: i,
                    calculated: crc8(&chunk[..2]),
                    received: chunk[2],
                });
            }
            decoded[i] = u16::from_be_bytes([chunk[0], chunk[1]]);
        }

        words.copy_from_slice(&decoded[..words.len()]);
        debug!("{:?} read: {:04X?}", command, words);
        Ok(())
    }

    /// Detects the sensor and starts the air quality algorithm.
    ///
    /// Reads the serial number, checks the product family in the feature
    /// set and sends the init command. Stops at the first failing step.
    /// The driver is `Ready` only if all three steps succeed.
    pub fn begin(&mut self) -> Result<(), Sgp30Error<I2C::Error>> {
        self.state = State::Uninitialized;

        let mut serial = [0u16; 3];
        self.execute(Command::GetSerialId, &[], &mut serial)?;
        self.serial_number =
            (u64::from(serial[0]) << 32) | (u64::from(serial[1]) << 16) | u64::from(serial[2]);
        debug!("Serial number 0x{:012X}", self.serial_number);

        let mut feature_set = [0u16; 1];
        self.execute(Command::GetFeatureSet, &[], &mut feature_set)?;
        debug!("Featureset 0x{:04X}", feature_set[0]);
        if (feature_set[0] & 0xF0) != self.config.feature_set {
            warn!(
                "Feature set 0x{:04X} does not match product family 0x{:04X}",
                feature_set[0], self.config.feature_set
            );
            return Err(Sgp30Error::FeatureSet(feature_set[0]));
        }

        self.iaq_init()?;

        self.state = State::Ready;
        debug!("SGP30 init sequence complete.");
        Ok(())
    }

    /// Starts the air quality algorithm. Baselines restart from scratch.
    pub fn iaq_init(&mut self) -> Result<(), Sgp30Error<I2C::Error>> {
        self.execute(Command::InitAirQuality, &[], &mut [])
    }

    /// Reads eCO2 and TVOC.
    ///
    /// Should be called once per second to keep the algorithm's
    /// baseline compensation working. On failure the previous
    /// values are kept.
    pub fn measure(&mut self) -> Result<(), Sgp30Error<I2C::Error>> {
        self.warn_if_not_ready("measure");
        let mut reply = [0u16; 2];
        self.execute(Command::MeasureAirQuality, &[], &mut reply)?;
        self.eco2 = reply[0];
        self.tvoc = reply[1];
        Ok(())
    }

    /// Reads the raw H2 and ethanol signals. On failure the previous
    /// values are kept.
    pub fn measure_raw(&mut self) -> Result<(), Sgp30Error<I2C::Error>> {
        self.warn_if_not_ready("measure_raw");
        let mut reply = [0u16; 2];
        self.execute(Command::MeasureRawSignals, &[], &mut reply)?;
        self.raw_h2 = reply[0];
        self.raw_ethanol = reply[1];
        Ok(())
    }

    /// Measures and returns eCO2 in ppm
    pub fn read_eco2(&mut self) -> Result<u16, Sgp30Error<I2C::Error>> {
        self.measure()?;
        Ok(self.eco2)
    }

    /// Measures and returns TVOC in ppb
    pub fn read_tvoc(&mut self) -> Result<u16, Sgp30Error<I2C::Error>> {
        self.measure()?;
        Ok(self.tvoc)
    }

    /// Sets the absolute humidity used for compensation.
    ///
    /// `absolute_humidity` is in mg/m3, at most 256000. Zero turns
    /// compensation off. Out of range values are rejected without
    /// touching the bus.
    pub fn set_humidity(&mut self, absolute_humidity: u32) -> Result<(), Sgp30Error<I2C::Error>> {
        if absolute_humidity > MAX_ABSOLUTE_HUMIDITY {
            warn!("Absolute humidity {} out of range", absolute_humidity);
            return Err(Sgp30Error::HumidityOutOfRange(absolute_humidity));
        }
        let scaled = scale_humidity(absolute_humidity);
        debug!("Setting humidity {} mg/m3 as 0x{:04X}", absolute_humidity, scaled);
        self.execute(Command::SetHumidity, &[scaled], &mut [])
    }

    /// Reads the current eCO2 and TVOC baselines
    pub fn get_baseline(&mut self) -> Result<Baseline, Sgp30Error<I2C::Error>> {
        let mut reply = [0u16; 2];
        self.execute(Command::GetBaseline, &[], &mut reply)?;
        Ok(Baseline {
            eco2: reply[0],
            tvoc: reply[1],
        })
    }

    /// Restores baselines previously read with `get_baseline`.
    /// Must be sent after `begin`.
    pub fn set_baseline(&mut self, baseline: Baseline) -> Result<(), Sgp30Error<I2C::Error>> {
        // the device takes TVOC first
        self.execute(Command::SetBaseline, &[baseline.tvoc, baseline.eco2], &mut [])
    }

    /// Soft reset the sensor device.
    /// The driver goes back to `Uninitialized`, `begin` has to be run again.
    pub fn soft_reset(&mut self) -> Result<(), Sgp30Error<I2C::Error>> {
        self.state = State::Uninitialized;
        self.execute(Command::SoftReset, &[], &mut [])
    }

    fn warn_if_not_ready(&self, op: &str) {
        if self.state != State::Ready {
            warn!("{} called before begin completed", op);
        }
    }
}

/// Converts absolute humidity in mg/m3 to the 8.8 fixed point g/m3
/// value the sensor expects.
pub fn scale_humidity(absolute_humidity: u32) -> u16 {
    ((u64::from(absolute_humidity) * 256 * 16777) >> 24) as u16
}
