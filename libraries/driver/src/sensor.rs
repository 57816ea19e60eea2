//! Sensor framework glue for the BMP180.
//!
//! Publishes up to three channels through a [`SensorRegistry`] and answers the
//! framework's reads from a [`Bmp180`] session.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embedded_hal_async::delay::DelayNs;
use hal::{SensorDriver, SensorKind, SensorReading, SensorRegistry};
use log::debug;

use crate::baro::bmp180::Bmp180;
use crate::bus::I2cDevice;
use crate::error::Bmp180Error;

/// Framework-facing BMP180 driver
pub struct Bmp180SensorDriver<R, I, D, M = CriticalSectionRawMutex>
where
    R: SensorRegistry,
    I: I2cDevice,
    D: DelayNs,
    M: RawMutex,
{
    device: Bmp180<I, D, M>,
    registry: R,
    registered: [bool; 3],
}

impl<R, I, D, M> Bmp180SensorDriver<R, I, D, M>
where
    R: SensorRegistry,
    I: I2cDevice,
    D: DelayNs,
    M: RawMutex,
{
    /// Wraps an open session. Nothing is registered yet.
    pub fn new(device: Bmp180<I, D, M>, registry: R) -> Self {
        Self {
            device,
            registry,
            registered: [false; 3],
        }
    }

    /// The underlying session, for mode and sea level changes
    pub fn device(&self) -> &Bmp180<I, D, M> {
        &self.device
    }

    /// Starts publishing `kind`. Registering an already published channel does nothing.
    pub fn register(&mut self, kind: SensorKind) {
        let entry = &mut self.registered[slot(kind)];
        if !*entry {
            debug!("registering {:?} channel", kind);
            self.registry.register(kind);
            *entry = true;
        }
    }

    /// Stops publishing `kind`. Unregistering an unpublished channel does nothing.
    pub fn unregister(&mut self, kind: SensorKind) {
        let entry = &mut self.registered[slot(kind)];
        if *entry {
            debug!("unregistering {:?} channel", kind);
            self.registry.unregister(kind);
            *entry = false;
        }
    }

    pub fn is_registered(&self, kind: SensorKind) -> bool {
        self.registered[slot(kind)]
    }

    /// Unregisters every channel, closes the session and returns the parts
    pub fn close(mut self) -> (I, D, R) {
        for kind in SensorKind::ALL {
            self.unregister(kind);
        }
        let (i2c, delay) = self.device.close();
        (i2c, delay, self.registry)
    }
}

impl<R, I, D, M> SensorDriver for Bmp180SensorDriver<R, I, D, M>
where
    R: SensorRegistry,
    I: I2cDevice,
    D: DelayNs,
    M: RawMutex,
{
    type Error = Bmp180Error<I::Error>;

    async fn read(&self, kind: SensorKind) -> Result<SensorReading, Self::Error> {
        let reading = match kind {
            SensorKind::Temperature => {
                let temperature = self.device.read_temperature().await?;
                SensorReading::new(kind, &[temperature])
            }
            SensorKind::Pressure => {
                let pressure = self.device.read_pressure().await?;
                SensorReading::new(kind, &[pressure as f32])
            }
            SensorKind::Barometer => {
                let m = self.device.read_all().await?;
                SensorReading::new(kind, &[m.pressure_pa, m.temperature_c, m.altitude_m])
            }
        };
        Ok(reading)
    }
}

fn slot(kind: SensorKind) -> usize {
    match kind {
        SensorKind::Temperature => 0,
        SensorKind::Pressure => 1,
        SensorKind::Barometer => 2,
    }
}
