// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! SGP30 driver implementing the I2C operations of the Sensirion SGP30 gas sensor
//!
//! Operations taken from the [datasheet](https://sensirion.com/media/documents/984E0DD5/61644B8B/Sensirion_Gas_Sensors_Datasheet_SGP30.pdf)
//!
//! - Serial number and feature set detection (`begin`)
//! - eCO2 / TVOC measurement
//! - Raw H2 / ethanol signals
//! - Absolute humidity compensation
//! - Baseline read back and restore
//! - Soft reset
//!
//! Every word read from the sensor is checked against its CRC-8 before it
//! is used. A failed transaction never overwrites previously read values.
//!
//! The driver is generic over the `embedded-hal` `I2c` and `DelayNs` traits.
//! `Sgp30::open_linux` wires it to `/dev/i2c-1` through `linux-embedded-hal`.
//!
//! ## Basic Example
//!
//! Obtaining eCO2 and TVOC once per second
//!
//!```no_run
//!use sgp30_i2c::sgp30::Sgp30;
//!use std::thread;
//!use std::time::Duration;
//!
//!fn main() {
//!    let mut sgp = Sgp30::open_linux().unwrap();
//!    sgp.begin().unwrap();
//!
//!    // 20 g/m3 of absolute humidity
//!    sgp.set_humidity(20_000).unwrap();
//!
//!    loop {
//!        match sgp.measure() {
//!            Ok(()) => println!("eCO2: {} ppm TVOC: {} ppb", sgp.eco2(), sgp.tvoc()),
//!            Err(e) => println!("Error obtaining measurements. More details: {}", e),
//!        }
//!        thread::sleep(Duration::from_secs(1));
//!    }
//!}
//!```
//!

/// Command codes and frame assembly
pub mod command;
/// Driver configuration
pub mod config;
/// CRC-8 checksum
pub mod crc;
/// SGP30 driver
pub mod sgp30;

pub use config::Config;
pub use sgp30::{Baseline, Sgp30, Sgp30Error, State};
