//! BMP180 compensation formulas.
//!
//! Integer implementation of the datasheet algorithm (BST-BMP180-DS000, section 3.5
//! "Calculating pressure and temperature"). Every intermediate has an explicit width:
//! products that can leave the `i32` range are carried in `i64`, and B4 is an
//! unsigned 32-bit value as the datasheet defines. Shifts of signed values are arithmetic and
//! signed divisions round toward negative infinity, which reproduces the worked
//! example of the datasheet bit for bit.

use crate::baro::bmp180::calibration::Calibration;
use crate::baro::bmp180::config::OversamplingMode;
use crate::error::CompensationError;

/// Result of the temperature formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompensatedTemperature {
    /// Intermediate B5, needed by the pressure formula
    pub b5: i32,
    /// Temperature in 0.1 °C (e.g. 150 = 15.0 °C)
    pub deci_celsius: i32,
}

impl CompensatedTemperature {
    pub fn celsius(&self) -> f32 {
        self.deci_celsius as f32 / 10.0
    }
}

/// Compensates the raw temperature `UT`.
///
/// Returns B5 alongside the temperature in 0.1 °C.
///
/// # Errors
/// `DivisionByZero` when `X1 + MD` is zero, which only degenerate coefficients produce.
pub fn compensate_temperature(
    ut: u16,
    cal: &Calibration,
) -> Result<CompensatedTemperature, CompensationError> {
    let x1 = ((i64::from(ut) - i64::from(cal.ac6)) * i64::from(cal.ac5)) >> 15;
    let x1 = x1 as i32;

    let divisor = x1 + i32::from(cal.md);
    if divisor == 0 {
        return Err(CompensationError::DivisionByZero { step: "X2" });
    }
    let x2 = div_floor(i64::from(cal.mc) << 11, i64::from(divisor)) as i32;

    let b5 = x1 + x2;
    Ok(CompensatedTemperature {
        b5,
        deci_celsius: (b5 + 8) >> 4,
    })
}

/// Assembles the raw pressure `UP` from the three output registers.
///
/// The conversion result is left-aligned in 24 bits; only the top `16 + oss` bits
/// are significant.
pub fn decode_raw_pressure(msb: u8, lsb: u8, xlsb: u8, mode: OversamplingMode) -> i32 {
    let raw = (u32::from(msb) << 16) | (u32::from(lsb) << 8) | u32::from(xlsb);
    (raw >> (8 - u32::from(mode.oss()))) as i32
}

/// Compensates the raw pressure `UP` taken in `mode`, using B5 from a temperature
/// conversion. Returns pressure in Pa.
///
/// # Errors
/// `DivisionByZero` when B4 is zero and `Overflow` when the result leaves the
/// `i32` range. Only degenerate coefficients or raw values produce either.
pub fn compensate_pressure(
    up: i32,
    b5: i32,
    cal: &Calibration,
    mode: OversamplingMode,
) -> Result<i32, CompensationError> {
    let oss = u32::from(mode.oss());

    let b6 = i64::from(b5) - 4000;
    let b6_sq = (b6 * b6) >> 12;

    let x1 = (i64::from(cal.b2) * b6_sq) >> 11;
    let x2 = (i64::from(cal.ac2) * b6) >> 11;
    let x3 = x1 + x2;
    let b3 = div_floor(((i64::from(cal.ac1) * 4 + x3) << oss) + 2, 4);

    let x1 = (i64::from(cal.ac3) * b6) >> 13;
    let x2 = (i64::from(cal.b1) * b6_sq) >> 16;
    let x3 = ((x1 + x2) + 2) >> 2;
    let b4: u32 = ((u64::from(cal.ac4) * u64::from((x3 + 32768) as u32)) >> 15) as u32;
    if b4 == 0 {
        return Err(CompensationError::DivisionByZero { step: "B4" });
    }
    let b4 = i64::from(b4);

    let b7 = (i64::from(up) - b3) * i64::from(50000u32 >> oss);
    let mut p = if b7 < 0x8000_0000 {
        div_floor(b7 * 2, b4)
    } else {
        div_floor(b7, b4) * 2
    };

    // second order correction
    let x1 = (p >> 8)
        .checked_mul(p >> 8)
        .and_then(|x1| x1.checked_mul(3038))
        .ok_or(CompensationError::Overflow { step: "X1" })?
        >> 16;
    let x2 = (-7357 * p) >> 16;
    p += (x1 + x2 + 3791) >> 4;

    i32::try_from(p).map_err(|_| CompensationError::Overflow { step: "p" })
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::DATASHEET_WORDS;

    fn datasheet_calibration() -> Calibration {
        Calibration::from_words::<()>(DATASHEET_WORDS).expect("datasheet words are valid")
    }

    #[test]
    fn test_temperature_datasheet_example() {
        let cal = datasheet_calibration();
        let t = compensate_temperature(27898, &cal).unwrap();
        assert_eq!(t.b5, 2399);
        assert_eq!(t.deci_celsius, 150);
        assert_eq!(t.celsius(), 15.0);
    }

    #[test]
    fn test_temperature_full_scale_raw_does_not_overflow() {
        let cal = datasheet_calibration();
        // (UT - AC6) * AC5 exceeds i32 here
        let t = compensate_temperature(u16::MAX, &cal).unwrap();
        assert!(t.deci_celsius > 150, "hotter raw value must read hotter, got {}", t.deci_celsius);
    }

    #[test]
    fn test_pressure_datasheet_example() {
        let cal = datasheet_calibration();
        let p = compensate_pressure(23843, 2399, &cal, OversamplingMode::UltraLowPower).unwrap();
        assert_eq!(p, 69964);
    }

    #[test]
    fn test_pressure_per_mode() {
        let cal = datasheet_calibration();
        let expected = [(23843, 69964), (47686, 69962), (95372, 69963), (190744, 69963)];
        for (mode, (up, pressure)) in OversamplingMode::ALL.into_iter().zip(expected) {
            assert_eq!(decode_raw_pressure(0x5D, 0x23, 0x00, mode), up, "raw decode in {:?}", mode);
            assert_eq!(
                compensate_pressure(up, 2399, &cal, mode).unwrap(),
                pressure,
                "compensated pressure in {:?}",
                mode
            );
        }
    }

    #[test]
    fn test_decode_uses_low_bits_at_high_oversampling() {
        assert_eq!(decode_raw_pressure(0x00, 0x00, 0xFF, OversamplingMode::UltraLowPower), 0);
        assert_eq!(decode_raw_pressure(0x00, 0x00, 0xFF, OversamplingMode::UltraHighRes), 7);
        assert_eq!(decode_raw_pressure(0xFF, 0xFF, 0xFF, OversamplingMode::UltraHighRes), 0x7FFFF);
    }

    #[test]
    fn test_degenerate_coefficients_report_division_by_zero() {
        let mut cal = datasheet_calibration();
        // X1 = 0 when UT == AC6, so MD = 0 zeroes the divisor
        cal.md = 0;
        assert_eq!(
            compensate_temperature(cal.ac6, &cal),
            Err(CompensationError::DivisionByZero { step: "X2" })
        );
    }

    #[test]
    fn test_tiny_b4_reports_overflow() {
        let mut cal = datasheet_calibration();
        // B4 collapses to 1, pushing p far beyond i32
        cal.ac4 = 1;
        assert_eq!(
            compensate_pressure(23843, 2399, &cal, OversamplingMode::UltraLowPower),
            Err(CompensationError::Overflow { step: "p" })
        );
        // the squared term no longer fits in i64
        assert_eq!(
            compensate_pressure(i32::MAX, 2399, &cal, OversamplingMode::UltraLowPower),
            Err(CompensationError::Overflow { step: "X1" })
        );
    }

    #[test]
    fn test_div_floor() {
        assert_eq!(div_floor(-17840128, 7611), -2344);
        assert_eq!(div_floor(17840128, 7611), 2343);
        assert_eq!(div_floor(-8, 4), -2);
        assert_eq!(div_floor(7, -2), -4);
    }
}
