// BMP180 I2C address (fixed, no address pin)
pub const BMP180_I2C_ADDR: u8 = 0x77;

// Calibration EEPROM, one big-endian word per coefficient
pub const BMP180_REG_CAL_AC1: u8 = 0xAA;
pub const BMP180_REG_CAL_AC2: u8 = 0xAC;
pub const BMP180_REG_CAL_AC3: u8 = 0xAE;
pub const BMP180_REG_CAL_AC4: u8 = 0xB0;
pub const BMP180_REG_CAL_AC5: u8 = 0xB2;
pub const BMP180_REG_CAL_AC6: u8 = 0xB4;
pub const BMP180_REG_CAL_B1: u8 = 0xB6;
pub const BMP180_REG_CAL_B2: u8 = 0xB8;
pub const BMP180_REG_CAL_MC: u8 = 0xBC;
pub const BMP180_REG_CAL_MD: u8 = 0xBE;

// Register addresses
pub const BMP180_REG_ID: u8 = 0xD0;
pub const BMP180_REG_RESET: u8 = 0xE0;
pub const BMP180_REG_CONTROL: u8 = 0xF4;
// Conversion result, MSB first; pressure adds LSB and XLSB at 0xF7/0xF8
pub const BMP180_REG_OUT_MSB: u8 = 0xF6;

// Chip ID for verification
pub const BMP180_CHIP_ID: u8 = 0x55;

// Reset command
pub const BMP180_RESET_CMD: u8 = 0xB6;
pub const BMP180_RESET_DELAY_MS: u32 = 10;

// Measurement commands, written to the control register
pub const BMP180_CMD_TEMPERATURE: u8 = 0x2E;
pub const BMP180_CMD_PRESSURE: u8 = 0x34;

// Conversion time of a temperature measurement
pub const BMP180_TEMPERATURE_DELAY_MS: u32 = 5;
