//! Register-file model of a BMP180 used by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;

use crate::baro::bmp180::calibration::CALIBRATION_REGISTERS;
use crate::baro::bmp180::registers::*;
use crate::bus::I2cDevice;

// Example coefficients from the BMP180 datasheet, section 3.5
pub const DATASHEET_WORDS: [u16; 10] = [
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

pub const DATASHEET_UT: u16 = 27898;

// UP = 23843 at oss 0, left-aligned in the three output registers
pub const DATASHEET_UP_BYTES: [u8; 3] = [0x5D, 0x23, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Nobody acknowledged the address or register
    Nack,
}

#[derive(Debug)]
pub struct BusState {
    pub registers: [u8; 256],
    /// Raw temperature latched on a temperature command
    pub ut: u16,
    /// Output bytes latched on a pressure command
    pub up_bytes: [u8; 3],
    /// Every value written to the control register
    pub commands: Vec<u8>,
    /// Number of write_read transfers
    pub reads: usize,
    /// Any transfer touching this register fails
    pub fail_register: Option<u8>,
}

/// Cloneable handle to a simulated device; clones share the same registers
#[derive(Debug, Clone)]
pub struct MockBus {
    pub state: Rc<RefCell<BusState>>,
}

impl MockBus {
    /// Device programmed with the datasheet example values
    pub fn datasheet() -> Self {
        let mut state = BusState {
            registers: [0u8; 256],
            ut: DATASHEET_UT,
            up_bytes: DATASHEET_UP_BYTES,
            commands: Vec::new(),
            reads: 0,
            fail_register: None,
        };
        for (word, (_, register)) in DATASHEET_WORDS.iter().zip(CALIBRATION_REGISTERS) {
            let [hi, lo] = word.to_be_bytes();
            state.registers[register as usize] = hi;
            state.registers[register as usize + 1] = lo;
        }
        state.registers[BMP180_REG_ID as usize] = BMP180_CHIP_ID;
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn fail_on(&self, register: u8) {
        self.state.borrow_mut().fail_register = Some(register);
    }

    pub fn clear_failure(&self) {
        self.state.borrow_mut().fail_register = None;
    }

    pub fn set_word(&self, register: u8, word: u16) {
        let [hi, lo] = word.to_be_bytes();
        let mut state = self.state.borrow_mut();
        state.registers[register as usize] = hi;
        state.registers[register as usize + 1] = lo;
    }

    pub fn set_register(&self, register: u8, value: u8) {
        self.state.borrow_mut().registers[register as usize] = value;
    }

    pub fn commands(&self) -> Vec<u8> {
        self.state.borrow().commands.clone()
    }

    /// How many times `command` was written to the control register
    pub fn command_count(&self, command: u8) -> usize {
        self.state.borrow().commands.iter().filter(|c| **c == command).count()
    }

    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }
}

impl I2cDevice for MockBus {
    type Error = MockError;

    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let (&register, payload) = data.split_first().ok_or(MockError::Nack)?;
        if addr != BMP180_I2C_ADDR || state.fail_register == Some(register) {
            return Err(MockError::Nack);
        }
        for (offset, value) in payload.iter().enumerate() {
            state.registers[register as usize + offset] = *value;
        }

        if register == BMP180_REG_CONTROL {
            let command = payload[0];
            state.commands.push(command);
            let out = BMP180_REG_OUT_MSB as usize;
            if command == BMP180_CMD_TEMPERATURE {
                let [hi, lo] = state.ut.to_be_bytes();
                state.registers[out] = hi;
                state.registers[out + 1] = lo;
            } else if command & 0x3F == BMP180_CMD_PRESSURE {
                let bytes = state.up_bytes;
                state.registers[out..out + 3].copy_from_slice(&bytes);
            }
        }
        Ok(())
    }

    async fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let register = *write_data.first().ok_or(MockError::Nack)?;
        let touched = register as usize..register as usize + read_data.len();
        if addr != BMP180_I2C_ADDR
            || state
                .fail_register
                .is_some_and(|failing| touched.contains(&(failing as usize)))
        {
            return Err(MockError::Nack);
        }
        state.reads += 1;
        read_data.copy_from_slice(&state.registers[touched]);
        Ok(())
    }
}

/// Delay provider that returns immediately and remembers what was asked for
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    pub waits_ms: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<u32> {
        self.waits_ms.borrow().clone()
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.borrow_mut().push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.borrow_mut().push(ms);
    }
}
