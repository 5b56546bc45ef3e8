// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! I2C commands understood by the SGP30.

use crate::crc::crc8;

/// Size of a reply word on the bus: two data bytes plus the checksum
pub const WORD_LEN: usize = 3;
/// Largest number of parameter words any command carries
pub const MAX_PARAMS: usize = 2;
/// Largest number of words any command replies with
pub const MAX_REPLY_WORDS: usize = 3;
/// Opcode plus every parameter word with its checksum
pub const MAX_COMMAND_LEN: usize = 2 + MAX_PARAMS * WORD_LEN;
/// Longest reply read back from the device
pub const MAX_REPLY_LEN: usize = MAX_REPLY_WORDS * WORD_LEN;

/// Commands sent to the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read the 48 bit serial number
    GetSerialId,
    /// Read product type and version
    GetFeatureSet,
    /// Start the air quality algorithm
    InitAirQuality,
    /// Read eCO2 and TVOC
    MeasureAirQuality,
    /// Read raw H2 and ethanol signals
    MeasureRawSignals,
    /// Write absolute humidity for compensation
    SetHumidity,
    /// Read eCO2 and TVOC baselines
    GetBaseline,
    /// Write TVOC and eCO2 baselines
    SetBaseline,
    /// Reset the sensor
    SoftReset,
}

impl Command {
    /// Opcode bytes, most significant first
    pub fn opcode(self) -> [u8; 2] {
        match self {
            Command::GetSerialId => [0x36, 0x82],
            Command::GetFeatureSet => [0x20, 0x2F],
            Command::InitAirQuality => [0x20, 0x03],
            Command::MeasureAirQuality => [0x20, 0x08],
            Command::MeasureRawSignals => [0x20, 0x50],
            Command::SetHumidity => [0x20, 0x61],
            Command::GetBaseline => [0x20, 0x15],
            Command::SetBaseline => [0x20, 0x1E],
            Command::SoftReset => [0x00, 0x06],
        }
    }

    /// Time the device needs between receiving the command and having the reply ready
    pub fn delay_ms(self) -> u32 {
        match self {
            Command::MeasureAirQuality => 12,
            Command::MeasureRawSignals => 25,
            _ => 10,
        }
    }

    /// Number of reply words the command produces
    pub fn reply_words(self) -> usize {
        match self {
            Command::GetSerialId => 3,
            Command::GetFeatureSet => 1,
            Command::MeasureAirQuality | Command::MeasureRawSignals | Command::GetBaseline => 2,
            Command::InitAirQuality
            | Command::SetHumidity
            | Command::SetBaseline
            | Command::SoftReset => 0,
        }
    }

    /// Number of parameter words the command expects
    pub fn param_words(self) -> usize {
        match self {
            Command::SetHumidity => 1,
            Command::SetBaseline => 2,
            _ => 0,
        }
    }
}

impl From<Command> for u16 {
    fn from(val: Command) -> Self {
        u16::from_be_bytes(val.opcode())
    }
}

/// A command frame ready to be written to the bus.
///
/// Every parameter word is followed by the checksum over its two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_COMMAND_LEN],
    len: usize,
}

impl Frame {
    /// Builds the frame for `command` carrying `params`.
    ///
    /// Returns `None` if the number of parameters does not match the command.
    pub fn new(command: Command, params: &[u16]) -> Option<Frame> {
        if params.len() != command.param_words() {
            return None;
        }
        let mut buf = [0u8; MAX_COMMAND_LEN];
        buf[..2].copy_from_slice(&command.opcode());
        let mut len = 2;
        for param in params {
            let bytes = param.to_be_bytes();
            buf[len] = bytes[0];
            buf[len + 1] = bytes[1];
            buf[len + 2] = crc8(&bytes);
            len += WORD_LEN;
        }
        Some(Frame { buf, len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
