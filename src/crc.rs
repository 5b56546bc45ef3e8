// Copyright 2024, F. Stan
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>,
// This file may not be copied, modified, or distributed
// except according to those terms.

//! CRC-8 used by the SGP30 to protect every 16-bit word on the bus.

/// Initial value of the CRC accumulator
pub const CRC8_INIT: u8 = 0xFF;
/// CRC-8 polynomial x^8 + x^5 + x^4 + 1
pub const CRC8_POLYNOMIAL: u8 = 0x31;

/// Computes the Sensirion CRC-8 over `data`.
///
/// MSB first, no input/output reflection and no final XOR.
/// More info regarding the [algorithm](https://en.wikipedia.org/wiki/Computation_of_cyclic_redundancy_checks)
///
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = CRC8_INIT;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if (crc & 0x80) != 0 {
                crc = (crc << 1) ^ CRC8_POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Checks a 3 byte reply word: two data bytes followed by their checksum.
///
/// Anything that is not exactly 3 bytes long is rejected.
pub fn verify_word(word: &[u8]) -> bool {
    word.len() == 3 && crc8(&word[..2]) == word[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc8_matches_datasheet_vector() {
        assert_eq!(crc8(&[0xBE, 0xEF]), 0x92);
    }

    #[test]
    fn crc8_is_deterministic() {
        let data = [0x1A, 0x2B, 0x3C, 0x4D, 0x00, 0xFF];
        assert_eq!(crc8(&data), crc8(&data));
        assert_eq!(crc8(&data[..2]), crc8(&[0x1A, 0x2B]));
    }

    #[test]
    fn crc8_of_empty_input_is_init_value() {
        assert_eq!(crc8(&[]), CRC8_INIT);
    }

    #[test]
    fn zero_word_checksum() {
        // Humidity compensation disabled is sent as 0x0000 + 0x81
        assert_eq!(crc8(&[0x00, 0x00]), 0x81);
    }

    #[test]
    fn verify_word_detects_tampering() {
        let crc = crc8(&[0xBE, 0xEF]);
        assert!(verify_word(&[0xBE, 0xEF, crc]));
        assert!(!verify_word(&[0xBE, 0xEE, crc]));
        assert!(!verify_word(&[0xBF, 0xEF, crc]));
        assert!(!verify_word(&[0xBE, 0xEF, crc ^ 0x01]));
    }

    #[test]
    fn verify_word_rejects_wrong_length() {
        assert!(!verify_word(&[0xBE, 0xEF]));
        assert!(!verify_word(&[0xBE, 0xEF, 0x92, 0x00]));
    }
}
