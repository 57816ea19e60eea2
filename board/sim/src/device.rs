//! Simulated BMP180 register file.
//!
//! Responds like the real part: calibration EEPROM at 0xAA, chip id at 0xD0, and
//! conversion results latched into 0xF6..0xF8 when a command hits 0xF4. The raw
//! values drift slowly so successive readings differ.

use driver::baro::bmp180::calibration::CALIBRATION_REGISTERS;
use driver::baro::bmp180::registers::*;
use driver::I2cDevice;

// Coefficients of the datasheet example unit
const CALIBRATION_WORDS: [u16; 10] = [
    408,
    (-72i16) as u16,
    (-14383i16) as u16,
    32741,
    32757,
    23153,
    6190,
    4,
    (-8711i16) as u16,
    2868,
];

const BASE_UT: i32 = 27898;
const BASE_UP: i32 = 23843;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

pub struct SimulatedBmp180 {
    registers: [u8; 256],
    conversions: u32,
}

impl SimulatedBmp180 {
    pub fn new() -> Self {
        let mut registers = [0u8; 256];
        for (word, (_, register)) in CALIBRATION_WORDS.iter().zip(CALIBRATION_REGISTERS) {
            registers[register as usize..register as usize + 2].copy_from_slice(&word.to_be_bytes());
        }
        registers[BMP180_REG_ID as usize] = BMP180_CHIP_ID;
        Self {
            registers,
            conversions: 0,
        }
    }

    // triangle wave, period 64 conversions
    fn drift(&self, amplitude: i32) -> i32 {
        let phase = (self.conversions % 64) as i32;
        let tri = if phase < 32 { phase } else { 64 - phase };
        (tri - 16) * amplitude / 16
    }

    fn convert(&mut self, command: u8) {
        self.conversions += 1;
        let out = BMP180_REG_OUT_MSB as usize;
        if command == BMP180_CMD_TEMPERATURE {
            let ut = (BASE_UT + self.drift(40)) as u16;
            self.registers[out..out + 2].copy_from_slice(&ut.to_be_bytes());
        } else if command & 0x3F == BMP180_CMD_PRESSURE {
            let up = (BASE_UP + self.drift(60)) as u32;
            let bytes = (up << 8).to_be_bytes();
            self.registers[out..out + 3].copy_from_slice(&bytes[1..]);
        }
    }
}

impl I2cDevice for SimulatedBmp180 {
    type Error = SimError;

    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        if addr != BMP180_I2C_ADDR {
            return Err(SimError);
        }
        match data {
            [BMP180_REG_CONTROL, command] => self.convert(*command),
            [BMP180_REG_RESET, BMP180_RESET_CMD] => self.conversions = 0,
            [register, value] => self.registers[*register as usize] = *value,
            _ => return Err(SimError),
        }
        Ok(())
    }

    async fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let start = match (addr, write_data) {
            (BMP180_I2C_ADDR, [register]) => *register as usize,
            _ => return Err(SimError),
        };
        let end = start + read_data.len();
        if end > self.registers.len() {
            return Err(SimError);
        }
        read_data.copy_from_slice(&self.registers[start..end]);
        Ok(())
    }
}
