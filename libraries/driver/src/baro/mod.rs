// Barometer driver module
//
// Shared measurement types and the altitude formula used by the chip drivers.
// Chip drivers own their bus and keep the latest readings behind a single lock.

use num_traits::Float;

pub mod bmp180;

pub use self::bmp180::Bmp180;

// Standard sea level pressure for altitude calculations (1013.25 hPa)
pub const STD_SEA_LEVEL_PRESSURE_PA: f32 = 101325.0;

// Exponent of the international barometric formula, 1 / 5.255
pub const BAROMETRIC_EXPONENT: f32 = 0.1903;

/// Barometer measurement state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaroMeasurement {
    /// Pressure in Pascals
    pub pressure_pa: f32,
    /// Temperature in Celsius
    pub temperature_c: f32,
    /// Altitude in meters relative to the sea level reference in use
    pub altitude_m: f32,
    /// Timestamp in milliseconds since boot
    pub timestamp_ms: u64,
}

/// Calculate altitude using the international barometric formula
///
/// `h = 44330 * (1 - (p / p0)^0.1903)`
pub fn altitude_m(pressure_pa: f32, sea_level_pa: f32) -> f32 {
    44330.0 * (1.0 - Float::powf(pressure_pa / sea_level_pa, BAROMETRIC_EXPONENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altitude_at_reference_is_zero() {
        assert_eq!(altitude_m(101325.0, STD_SEA_LEVEL_PRESSURE_PA), 0.0);
    }

    #[test]
    fn test_altitude_datasheet_pressure() {
        let altitude = altitude_m(69964.0, 101325.0);
        assert!(
            (altitude - 3016.7).abs() < 1.0,
            "Expected altitude around 3016.7 m, got {}",
            altitude
        );
    }

    #[test]
    fn test_altitude_below_sea_level() {
        let altitude = altitude_m(102000.0, STD_SEA_LEVEL_PRESSURE_PA);
        assert!(altitude < 0.0, "Pressure above reference must give negative altitude, got {}", altitude);
    }

    #[test]
    fn test_altitude_follows_reference() {
        let low = altitude_m(90000.0, 100000.0);
        let high = altitude_m(90000.0, 102000.0);
        assert!(high > low, "A higher reference must raise the altitude ({} vs {})", high, low);
    }
}
