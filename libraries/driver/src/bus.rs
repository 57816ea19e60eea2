//! Register-addressed access to devices on a two-wire bus

use embedded_hal_async::i2c::I2c;

/// Common interface for I2C device operations with async support
///
/// Only `write` and `write_read` are required; the register helpers are built on
/// top of them. Multi-byte words are big-endian, most significant byte at the
/// lower register address.
pub trait I2cDevice {
    /// Error produced by a failed transfer
    type Error: core::fmt::Debug;

    /// Write data to a device at the specified address
    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write data to a device and then read from it (combined operation)
    async fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Read a single register from a device
    async fn read_reg(&mut self, addr: u8, reg: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8; 1];
        self.write_read(addr, &[reg], &mut buffer).await?;
        Ok(buffer[0])
    }

    /// Write to a single register on a device
    async fn write_reg(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.write(addr, &[reg, value]).await
    }

    /// Read multiple consecutive registers from a device
    async fn read_regs(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        self.write_read(addr, &[reg], data).await
    }

    /// Read an unsigned big-endian word starting at `reg`
    async fn read_u16_be(&mut self, addr: u8, reg: u8) -> Result<u16, Self::Error> {
        let mut buffer = [0u8; 2];
        self.read_regs(addr, reg, &mut buffer).await?;
        Ok(u16::from_be_bytes(buffer))
    }
}

/// Adapter exposing any `embedded-hal-async` I2C bus as an [`I2cDevice`]
pub struct I2cBus<I> {
    i2c: I,
}

impl<I: I2c> I2cBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Give back the wrapped bus
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> I2cDevice for I2cBus<I> {
    type Error = I::Error;

    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(addr, data).await
    }

    async fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(addr, write_data, read_data).await
    }
}
