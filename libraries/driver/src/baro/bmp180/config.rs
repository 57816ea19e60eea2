//! BMP180 session configuration and oversampling modes.

use embassy_time::Duration;

use crate::baro::bmp180::registers::{BMP180_CMD_PRESSURE, BMP180_I2C_ADDR};
use crate::error::InvalidMode;

/// Sea level reference used until the caller sets one (Pa)
pub const DEFAULT_SEA_LEVEL_PRESSURE_PA: f32 = 101500.0;

/// Default validity window of cached readings
pub const DEFAULT_FRESHNESS: Duration = Duration::from_millis(50);

/// Pressure oversampling setting (`oss` in the datasheet)
///
/// Higher settings average more internal samples: lower noise, longer conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum OversamplingMode {
    /// 1 sample, 4.5 ms conversion
    UltraLowPower = 0,
    /// 2 samples, 7.5 ms conversion
    Standard = 1,
    /// 4 samples, 13.5 ms conversion
    HighRes = 2,
    /// 8 samples, 25.5 ms conversion
    #[default]
    UltraHighRes = 3,
}

impl OversamplingMode {
    pub const ALL: [OversamplingMode; 4] = [
        OversamplingMode::UltraLowPower,
        OversamplingMode::Standard,
        OversamplingMode::HighRes,
        OversamplingMode::UltraHighRes,
    ];

    /// The `oss` value used in shifts and in the command byte
    pub const fn oss(self) -> u8 {
        self as u8
    }

    /// Time to wait between the pressure command and reading the result
    pub const fn conversion_delay_ms(self) -> u32 {
        match self {
            OversamplingMode::UltraLowPower => 5,
            OversamplingMode::Standard => 8,
            OversamplingMode::HighRes => 14,
            OversamplingMode::UltraHighRes => 26,
        }
    }

    /// Control register value that starts a pressure conversion in this mode
    pub const fn pressure_command(self) -> u8 {
        BMP180_CMD_PRESSURE + (self.oss() << 6)
    }
}

impl TryFrom<u8> for OversamplingMode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OversamplingMode::UltraLowPower),
            1 => Ok(OversamplingMode::Standard),
            2 => Ok(OversamplingMode::HighRes),
            3 => Ok(OversamplingMode::UltraHighRes),
            other => Err(InvalidMode(other)),
        }
    }
}

/// Configuration for a BMP180 session
#[derive(Debug, Clone, Copy)]
pub struct Bmp180Config {
    /// I2C address of the device
    pub address: u8,

    /// Oversampling mode used for pressure reads until changed
    pub mode: OversamplingMode,

    /// Sea level reference pressure for altitude (Pa)
    pub sea_level_pa: f32,

    /// How long a cached reading stays valid; zero disables caching
    pub freshness: Duration,

    /// Check the chip id register when opening the session
    pub verify_chip_id: bool,
}

impl Default for Bmp180Config {
    fn default() -> Self {
        Self {
            address: BMP180_I2C_ADDR,
            mode: OversamplingMode::default(),
            sea_level_pa: DEFAULT_SEA_LEVEL_PRESSURE_PA,
            freshness: DEFAULT_FRESHNESS,
            verify_chip_id: true,
        }
    }
}

impl Bmp180Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_mode(mut self, mode: OversamplingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sea_level_pressure(mut self, pressure_pa: f32) -> Self {
        self.sea_level_pa = pressure_pa;
        self
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_chip_id_check(mut self, verify: bool) -> Self {
        self.verify_chip_id = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_tables() {
        let delays: [u32; 4] = OversamplingMode::ALL.map(|m| m.conversion_delay_ms());
        assert_eq!(delays, [5, 8, 14, 26]);

        let commands: [u8; 4] = OversamplingMode::ALL.map(|m| m.pressure_command());
        assert_eq!(commands, [0x34, 0x74, 0xB4, 0xF4]);
    }

    #[test]
    fn test_mode_from_u8() {
        for mode in OversamplingMode::ALL {
            assert_eq!(OversamplingMode::try_from(mode.oss()), Ok(mode));
        }
        assert_eq!(OversamplingMode::try_from(4), Err(InvalidMode(4)));
    }

    #[test]
    fn test_default_config() {
        let config = Bmp180Config::default();
        assert_eq!(config.address, 0x77);
        assert_eq!(config.mode, OversamplingMode::UltraHighRes);
        assert_eq!(config.sea_level_pa, 101500.0);
        assert_eq!(config.freshness, Duration::from_millis(50));
        assert!(config.verify_chip_id);
    }
}
