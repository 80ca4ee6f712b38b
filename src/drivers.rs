//! Peripheral Drivers
//!
//! Drivers for the external chips and operator inputs. These provide
//! domain-specific abstractions over the HAL seams.

pub mod dds;
pub mod eeprom;
pub mod encoder;
pub mod keypad;
pub mod si5351;
