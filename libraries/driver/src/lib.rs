#![cfg_attr(not(test), no_std)]

pub mod baro;
pub mod bus;
pub mod error;
pub mod sensor;

pub use baro::bmp180::{Bmp180, Bmp180Config, Calibration, OversamplingMode};
pub use bus::{I2cBus, I2cDevice};
pub use error::{Bmp180Error, CalibrationError, CompensationError, InvalidMode};
pub use sensor::Bmp180SensorDriver;

#[cfg(test)]
pub(crate) mod mock;
