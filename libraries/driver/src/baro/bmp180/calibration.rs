//! BMP180 calibration coefficients.
//!
//! Eleven 16-bit words are factory-programmed into the EEPROM at 0xAA–0xBF. Ten
//! of them feed the compensation formulas; MB (0xBA) is unused and never read.
//! AC4, AC5 and AC6 are unsigned, the rest are two's complement.

use log::debug;

use crate::baro::bmp180::registers::*;
use crate::bus::I2cDevice;
use crate::error::CalibrationError;

/// Factory-trimmed calibration coefficients
///
/// Only constructed by [`Calibration::load`] or [`Calibration::from_words`], both of
/// which reject unprogrammed words, so holding one means it is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub ac1: i16,
    pub ac2: i16,
    pub ac3: i16,
    pub ac4: u16,
    pub ac5: u16,
    pub ac6: u16,
    pub b1: i16,
    pub b2: i16,
    pub mc: i16,
    pub md: i16,
}

/// Coefficient names and registers, in EEPROM order
pub const CALIBRATION_REGISTERS: [(&str, u8); 10] = [
    ("AC1", BMP180_REG_CAL_AC1),
    ("AC2", BMP180_REG_CAL_AC2),
    ("AC3", BMP180_REG_CAL_AC3),
    ("AC4", BMP180_REG_CAL_AC4),
    ("AC5", BMP180_REG_CAL_AC5),
    ("AC6", BMP180_REG_CAL_AC6),
    ("B1", BMP180_REG_CAL_B1),
    ("B2", BMP180_REG_CAL_B2),
    ("MC", BMP180_REG_CAL_MC),
    ("MD", BMP180_REG_CAL_MD),
];

impl Calibration {
    /// Reads the ten coefficient words from the device.
    ///
    /// # Errors
    /// - `CalibrationError::Read` if any word cannot be read
    /// - `CalibrationError::Invalid` if any word is 0x0000 or 0xFFFF
    pub async fn load<I: I2cDevice>(
        i2c: &mut I,
        addr: u8,
    ) -> Result<Self, CalibrationError<I::Error>> {
        let mut words = [0u16; 10];
        for (word, (coefficient, register)) in words.iter_mut().zip(CALIBRATION_REGISTERS) {
            *word = i2c
                .read_u16_be(addr, register)
                .await
                .map_err(|cause| CalibrationError::Read {
                    coefficient,
                    register,
                    cause,
                })?;
            debug!("calibration {} = {:#06x}", coefficient, *word);
        }
        Self::from_words(words)
    }

    /// Builds the coefficients from raw EEPROM words in [`CALIBRATION_REGISTERS`] order.
    ///
    /// A word of 0x0000 or 0xFFFF means the EEPROM was not programmed or the bus
    /// returned idle lines.
    pub fn from_words<E: core::fmt::Debug>(words: [u16; 10]) -> Result<Self, CalibrationError<E>> {
        if let Some((raw, (coefficient, _))) = words
            .iter()
            .zip(CALIBRATION_REGISTERS)
            .find(|(raw, _)| **raw == 0x0000 || **raw == 0xFFFF)
        {
            return Err(CalibrationError::Invalid {
                coefficient,
                raw: *raw,
            });
        }

        Ok(Self {
            ac1: words[0] as i16,
            ac2: words[1] as i16,
            ac3: words[2] as i16,
            ac4: words[3],
            ac5: words[4],
            ac6: words[5],
            b1: words[6] as i16,
            b2: words[7] as i16,
            mc: words[8] as i16,
            md: words[9] as i16,
        })
    }
}
