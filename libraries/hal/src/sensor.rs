//! Sensor framework interface
//!
//! A platform sensor subsystem polls drivers through [`SensorDriver`] and learns
//! which channels a driver offers through [`SensorRegistry`].

use heapless::Vec;

/// Maximum number of values carried by one reading
pub const MAX_READING_VALUES: usize = 3;

/// Channels a barometric driver can publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Ambient temperature in Celsius
    Temperature,
    /// Pressure in Pascals
    Pressure,
    /// Pressure, temperature and altitude together
    Barometer,
}

impl SensorKind {
    /// All channels, in registration order
    pub const ALL: [SensorKind; 3] = [
        SensorKind::Temperature,
        SensorKind::Pressure,
        SensorKind::Barometer,
    ];

    /// Number of values a reading of this kind carries
    pub const fn value_count(self) -> usize {
        match self {
            SensorKind::Temperature | SensorKind::Pressure => 1,
            SensorKind::Barometer => 3,
        }
    }
}

/// One sample handed to the sensor framework
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Channel the values belong to
    pub kind: SensorKind,
    /// Values in channel order
    pub values: Vec<f32, MAX_READING_VALUES>,
}

impl SensorReading {
    /// Build a reading from a slice of values
    ///
    /// Values beyond [`MAX_READING_VALUES`] are dropped.
    pub fn new(kind: SensorKind, values: &[f32]) -> Self {
        let mut buffer = Vec::new();
        for value in values.iter().take(MAX_READING_VALUES) {
            // capacity checked by take()
            let _ = buffer.push(*value);
        }
        Self {
            kind,
            values: buffer,
        }
    }
}

/// Driver side of the framework: produces readings on request
pub trait SensorDriver {
    type Error;

    /// Read one sample for the given channel
    async fn read(&self, kind: SensorKind) -> Result<SensorReading, Self::Error>;
}

/// Framework side: keeps track of the channels a driver publishes
pub trait SensorRegistry {
    /// Start routing readings of `kind` into the platform sensor subsystem
    fn register(&mut self, kind: SensorKind);

    /// Stop routing readings of `kind`
    fn unregister(&mut self, kind: SensorKind);
}
