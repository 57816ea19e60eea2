#![no_std]

mod baro;
mod sensor;

pub use baro::*;
pub use sensor::*;
