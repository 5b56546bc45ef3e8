// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

/// Factory I2C address of the SGP30
pub const DEFAULT_ADDRESS: u8 = 0x58;
/// Product type nibble reported in the feature set of an SGP30
pub const SGP30_FEATURESET: u16 = 0x0020;
/// Bus opened by `Sgp30::open_linux`
pub const DEFAULT_BUS_PATH: &str = "/dev/i2c-1";

/// Configuration settings for the SGP30 driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// I2C address of the sensor
    pub address: u8,
    /// Expected value of `feature_set & 0xF0`
    pub feature_set: u16,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `address` - The I2C address of the sensor.
    /// * `feature_set` - The product family the sensor must report.
    pub fn new(address: u8, feature_set: u16) -> Config {
        Config {
            address,
            feature_set,
        }
    }

    /// Sets the I2C address.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Sets the expected product family.
    pub fn feature_set(mut self, feature_set: u16) -> Self {
        self.feature_set = feature_set;
        self
    }
}

impl Default for Config {
    /// Address `0x58`, SGP30 product family.
    fn default() -> Config {
        Config {
            address: DEFAULT_ADDRESS,
            feature_set: SGP30_FEATURESET,
        }
    }
}
