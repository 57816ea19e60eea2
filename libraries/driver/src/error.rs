use thiserror::Error;

/// Errors reported by the BMP180 driver
///
/// `E` is the error type of the underlying [`I2cDevice`](crate::bus::I2cDevice).
#[derive(Error, Debug, PartialEq)]
pub enum Bmp180Error<E: core::fmt::Debug> {
    /// A bus read or write failed; the operation is not retried
    #[error("bus transfer failed at register {register:#04x}: {cause:?}")]
    Transport {
        /// Register the transfer was addressed to
        register: u8,
        /// Error reported by the bus
        cause: E,
    },

    /// Calibration coefficients could not be loaded at open
    #[error("calibration failed: {0}")]
    Calibration(CalibrationError<E>),

    /// The chip id register did not identify a BMP180
    #[error("unexpected chip id {0:#04x}")]
    UnknownChip(u8),

    /// Compensation arithmetic left its valid range
    #[error("compensation failed: {0}")]
    Compensation(#[from] CompensationError),
}

/// Failure while reading the factory calibration block
#[derive(Error, Debug, PartialEq)]
pub enum CalibrationError<E: core::fmt::Debug> {
    /// The coefficient word could not be read from the bus
    #[error("reading {coefficient} at {register:#04x} failed: {cause:?}")]
    Read {
        coefficient: &'static str,
        register: u8,
        cause: E,
    },

    /// The coefficient word holds a value the factory never programs
    #[error("{coefficient} holds invalid word {raw:#06x}")]
    Invalid { coefficient: &'static str, raw: u16 },
}

impl<E: core::fmt::Debug> From<CalibrationError<E>> for Bmp180Error<E> {
    fn from(err: CalibrationError<E>) -> Self {
        Bmp180Error::Calibration(err)
    }
}

/// Arithmetic failure inside the compensation formulas
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompensationError {
    #[error("division by zero in {step}")]
    DivisionByZero { step: &'static str },

    #[error("{step} out of range")]
    Overflow { step: &'static str },
}

/// Oversampling setting outside 0..=3
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("oversampling mode {0} is not one of 0..=3")]
pub struct InvalidMode(pub u8);
