//! Barometer sensor interface

/// Barometer sensor interface
///
/// Implemented by drivers that can produce calibrated pressure, temperature and
/// altitude on request. Every read may touch the bus, so every read is fallible.
pub trait BaroSensor {
    /// Error reported by the underlying device
    type Error;

    /// Get the current pressure in Pascals
    async fn get_pressure(&self) -> Result<f32, Self::Error>;

    /// Get the current temperature in Celsius
    async fn get_temperature(&self) -> Result<f32, Self::Error>;

    /// Get the estimated altitude in meters based on pressure
    async fn get_altitude(&self) -> Result<f32, Self::Error>;

    /// Set the sea level reference pressure in Pascals
    ///
    /// This is used for altitude calculations
    async fn set_sea_level_pressure(&self, pressure_pa: f32);

    /// Check that the device on the bus is the expected chip
    ///
    /// Returns true if the sensor passed the self-test
    async fn self_test(&self) -> Result<bool, Self::Error>;

    /// Reset the sensor to default state
    async fn reset(&self) -> Result<(), Self::Error>;
}
