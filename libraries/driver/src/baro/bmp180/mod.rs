//! BMP180 digital pressure sensor driver.
//!
//! A [`Bmp180`] is one device session: it loads the factory calibration when
//! opened and then serves temperature, pressure and altitude readings. All state
//! (bus, delay provider, coefficients, mode, sea level reference and caches) sits
//! behind one async mutex, held for the whole of every operation, so at most one
//! command/wait/read sequence is on the bus at any time.

pub mod cache;
pub mod calibration;
pub mod compensation;
pub mod config;
pub mod registers;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;
use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};

use crate::baro::{altitude_m, BaroMeasurement};
use crate::bus::I2cDevice;
use crate::error::Bmp180Error;

use self::cache::{ReadingCache, ReadingKind};
use self::compensation::{compensate_pressure, compensate_temperature, decode_raw_pressure};
use self::registers::*;

pub use self::calibration::Calibration;
pub use self::config::{Bmp180Config, OversamplingMode};

type Result<T, E> = core::result::Result<T, Bmp180Error<E>>;

/// Everything guarded by the session lock
struct Bmp180State<I, D> {
    i2c: I,
    delay: D,
    addr: u8,
    cal: Calibration,
    mode: OversamplingMode,
    sea_level_pa: f32,
    cache: ReadingCache,
}

/// BMP180 session
///
/// Operations take `&self`; share the session between tasks by reference.
/// `M` selects the mutex flavour, see `embassy_sync::blocking_mutex::raw`.
pub struct Bmp180<I: I2cDevice, D: DelayNs, M: RawMutex = CriticalSectionRawMutex> {
    state: Mutex<M, Bmp180State<I, D>>,
}

impl<I: I2cDevice, D: DelayNs, M: RawMutex> Bmp180<I, D, M> {
    /// Opens a session on the device at `config.address`.
    ///
    /// Sequence:
    /// 1. Verify chip ID (0xD0 == 0x55), unless disabled in the config
    /// 2. Read the ten calibration coefficients
    ///
    /// # Errors
    /// - `Transport` if the chip ID cannot be read
    /// - `UnknownChip` if the chip ID does not match
    /// - `Calibration` if any coefficient cannot be read or is unprogrammed
    pub async fn open(mut i2c: I, delay: D, config: Bmp180Config) -> Result<Self, I::Error> {
        let addr = config.address;

        if config.verify_chip_id {
            let chip_id = i2c
                .read_reg(addr, BMP180_REG_ID)
                .await
                .map_err(transport(BMP180_REG_ID))?;
            if chip_id != BMP180_CHIP_ID {
                warn!("BMP180 chip id mismatch: {:#04x}", chip_id);
                return Err(Bmp180Error::UnknownChip(chip_id));
            }
        }

        let cal = Calibration::load(&mut i2c, addr).await.map_err(|err| {
            warn!("BMP180 calibration failed: {}", err);
            Bmp180Error::Calibration(err)
        })?;

        info!("BMP180 session opened at {:#04x}, mode {:?}", addr, config.mode);
        Ok(Self {
            state: Mutex::new(Bmp180State {
                i2c,
                delay,
                addr,
                cal,
                mode: config.mode,
                sea_level_pa: config.sea_level_pa,
                cache: ReadingCache::new(config.freshness),
            }),
        })
    }

    /// Closes the session and gives back the bus and delay provider.
    ///
    /// Taking `self` by value guarantees no operation is still running.
    pub fn close(self) -> (I, D) {
        let state = self.state.into_inner();
        info!("BMP180 session at {:#04x} closed", state.addr);
        (state.i2c, state.delay)
    }

    /// Temperature in °C, resolution 0.1 °C
    pub async fn read_temperature(&self) -> Result<f32, I::Error> {
        let mut state = self.state.lock().await;
        Ok(state.temperature().await? as f32 / 10.0)
    }

    /// Pressure in Pa
    pub async fn read_pressure(&self) -> Result<i32, I::Error> {
        self.state.lock().await.pressure().await
    }

    /// Altitude in m relative to the current sea level reference
    pub async fn read_altitude(&self) -> Result<f32, I::Error> {
        self.state.lock().await.altitude().await
    }

    /// Pressure, temperature and altitude from one pair of conversions
    pub async fn read_all(&self) -> Result<BaroMeasurement, I::Error> {
        let mut state = self.state.lock().await;
        let (pressure, temperature) = state.sample().await?;
        let pressure_pa = pressure as f32;
        Ok(BaroMeasurement {
            pressure_pa,
            temperature_c: temperature as f32 / 10.0,
            altitude_m: altitude_m(pressure_pa, state.sea_level_pa),
            timestamp_ms: Instant::now().as_millis(),
        })
    }

    /// Uncompensated temperature `UT`
    pub async fn read_raw_temperature(&self) -> Result<u16, I::Error> {
        self.state.lock().await.raw_temperature().await
    }

    /// Uncompensated pressure `UP` in the current mode
    pub async fn read_raw_pressure(&self) -> Result<i32, I::Error> {
        self.state.lock().await.raw_pressure().await
    }

    /// Changes the oversampling mode used by subsequent pressure reads
    pub async fn set_mode(&self, mode: OversamplingMode) {
        let mut state = self.state.lock().await;
        if state.mode != mode {
            info!("BMP180 mode {:?} -> {:?}", state.mode, mode);
        }
        state.mode = mode;
    }

    pub async fn mode(&self) -> OversamplingMode {
        self.state.lock().await.mode
    }

    /// Sets the sea level reference pressure (Pa) used for altitude
    pub async fn set_sea_level_pressure(&self, pressure_pa: f32) {
        self.state.lock().await.sea_level_pa = pressure_pa;
    }

    pub async fn sea_level_pressure(&self) -> f32 {
        self.state.lock().await.sea_level_pa
    }

    /// Copy of the coefficients loaded at open
    pub async fn calibration(&self) -> Calibration {
        self.state.lock().await.cal
    }

    /// Checks that the chip ID register still reads 0x55
    pub async fn self_test(&self) -> Result<bool, I::Error> {
        let mut state = self.state.lock().await;
        let addr = state.addr;
        let chip_id = state
            .i2c
            .read_reg(addr, BMP180_REG_ID)
            .await
            .map_err(transport(BMP180_REG_ID))?;
        Ok(chip_id == BMP180_CHIP_ID)
    }

    /// Soft reset. The calibration EEPROM is unaffected, so coefficients are kept.
    pub async fn reset(&self) -> Result<(), I::Error> {
        let mut state = self.state.lock().await;
        let addr = state.addr;
        state
            .i2c
            .write_reg(addr, BMP180_REG_RESET, BMP180_RESET_CMD)
            .await
            .map_err(transport(BMP180_REG_RESET))?;
        state.delay.delay_ms(BMP180_RESET_DELAY_MS).await;
        debug!("BMP180 soft reset done");
        Ok(())
    }
}

impl<I: I2cDevice, D: DelayNs> Bmp180State<I, D> {
    /// Writes a measurement command and waits for the conversion to finish
    async fn start_conversion(&mut self, command: u8, wait_ms: u32) -> Result<(), I::Error> {
        self.i2c
            .write_reg(self.addr, BMP180_REG_CONTROL, command)
            .await
            .map_err(transport(BMP180_REG_CONTROL))?;
        self.delay.delay_ms(wait_ms).await;
        Ok(())
    }

    async fn raw_temperature(&mut self) -> Result<u16, I::Error> {
        if let Some(ut) = self.cache.get(ReadingKind::RawTemperature, self.mode, Instant::now()) {
            debug!("raw temperature cache hit: {}", ut);
            return Ok(ut as u16);
        }

        self.start_conversion(BMP180_CMD_TEMPERATURE, BMP180_TEMPERATURE_DELAY_MS)
            .await?;
        let ut = self
            .i2c
            .read_u16_be(self.addr, BMP180_REG_OUT_MSB)
            .await
            .map_err(transport(BMP180_REG_OUT_MSB))?;
        debug!("UT = {}", ut);

        self.cache
            .set(ReadingKind::RawTemperature, i32::from(ut), self.mode, Instant::now());
        Ok(ut)
    }

    async fn raw_pressure(&mut self) -> Result<i32, I::Error> {
        let mode = self.mode;
        if let Some(up) = self.cache.get(ReadingKind::RawPressure, mode, Instant::now()) {
            debug!("raw pressure cache hit: {}", up);
            return Ok(up);
        }

        self.start_conversion(mode.pressure_command(), mode.conversion_delay_ms())
            .await?;
        let mut buffer = [0u8; 3];
        self.i2c
            .read_regs(self.addr, BMP180_REG_OUT_MSB, &mut buffer)
            .await
            .map_err(transport(BMP180_REG_OUT_MSB))?;
        let up = decode_raw_pressure(buffer[0], buffer[1], buffer[2], mode);
        debug!("UP = {} ({:?})", up, mode);

        self.cache.set(ReadingKind::RawPressure, up, mode, Instant::now());
        Ok(up)
    }

    /// Compensated temperature in 0.1 °C
    async fn temperature(&mut self) -> Result<i32, I::Error> {
        if let Some(t) = self.cache.get(ReadingKind::Temperature, self.mode, Instant::now()) {
            return Ok(t);
        }

        let ut = self.raw_temperature().await?;
        let t = compensate_temperature(ut, &self.cal)?;
        self.cache
            .set(ReadingKind::Temperature, t.deci_celsius, self.mode, Instant::now());
        Ok(t.deci_celsius)
    }

    /// Compensated pressure in Pa
    async fn pressure(&mut self) -> Result<i32, I::Error> {
        Ok(self.sample().await?.0)
    }

    /// Compensated pressure (Pa) and the temperature (0.1 °C) whose B5 produced it
    ///
    /// Both come from the same temperature conversion and are cached together.
    async fn sample(&mut self) -> Result<(i32, i32), I::Error> {
        let mode = self.mode;
        let now = Instant::now();
        if let (Some(p), Some(t)) = (
            self.cache.get(ReadingKind::Pressure, mode, now),
            self.cache.get(ReadingKind::Temperature, mode, now),
        ) {
            return Ok((p, t));
        }

        let ut = self.raw_temperature().await?;
        let up = self.raw_pressure().await?;

        let t = compensate_temperature(ut, &self.cal)?;
        let p = compensate_pressure(up, t.b5, &self.cal, mode)?;

        let now = Instant::now();
        self.cache.set(ReadingKind::Temperature, t.deci_celsius, mode, now);
        self.cache.set(ReadingKind::Pressure, p, mode, now);
        Ok((p, t.deci_celsius))
    }

    async fn altitude(&mut self) -> Result<f32, I::Error> {
        let pressure = self.pressure().await?;
        Ok(altitude_m(pressure as f32, self.sea_level_pa))
    }
}

impl<I: I2cDevice, D: DelayNs, M: RawMutex> hal::BaroSensor for Bmp180<I, D, M> {
    type Error = Bmp180Error<I::Error>;

    async fn get_pressure(&self) -> Result<f32, I::Error> {
        Ok(self.read_pressure().await? as f32)
    }

    async fn get_temperature(&self) -> Result<f32, I::Error> {
        self.read_temperature().await
    }

    async fn get_altitude(&self) -> Result<f32, I::Error> {
        self.read_altitude().await
    }

    async fn set_sea_level_pressure(&self, pressure_pa: f32) {
        Bmp180::set_sea_level_pressure(self, pressure_pa).await
    }

    async fn self_test(&self) -> Result<bool, I::Error> {
        Bmp180::self_test(self).await
    }

    async fn reset(&self) -> Result<(), I::Error> {
        Bmp180::reset(self).await
    }
}

/// Wraps a bus error with the register it was addressed to
fn transport<E: core::fmt::Debug>(register: u8) -> impl FnOnce(E) -> Bmp180Error<E> {
    move |cause| {
        warn!("BMP180 bus transfer at {:#04x} failed: {:?}", register, cause);
        Bmp180Error::Transport { register, cause }
    }
}
