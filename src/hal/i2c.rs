//! I2C Bus Abstractions
//!
//! Register-addressed access for the `Si5351A` (8-bit register numbers)
//! and the 24C65 EEPROM (16-bit memory addresses) on top of the
//! blocking `embedded-hal` I2C trait.

use embedded_hal::i2c::I2c;

use crate::config::{EEPROM_I2C_ADDR, SI5351_I2C_ADDR};
use crate::error::{Error, Result};

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// `Si5351A` clock synthesizer address
    pub const SI5351: Self = Self(SI5351_I2C_ADDR);

    /// 24C65 EEPROM address
    pub const EEPROM: Self = Self(EEPROM_I2C_ADDR);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// I2C bus wrapper bound to one device
#[derive(Debug)]
pub struct I2cBus<I2C> {
    i2c: I2C,
    addr: I2cAddress,
}

impl<I2C: I2c> I2cBus<I2C> {
    /// Create a bus wrapper talking to `addr`
    #[must_use]
    pub const fn new(i2c: I2C, addr: I2cAddress) -> Self {
        Self { i2c, addr }
    }

    /// Write a single 8-bit-addressed register (one start/stop bracket)
    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.addr.addr(), &[reg, value])
            .map_err(Error::bus)
    }

    /// Read a single 8-bit-addressed register
    pub fn read_reg(&mut self, reg: u8) -> Result<u8> {
        let mut buf = [0u8];
        self.i2c
            .write_read(self.addr.addr(), &[reg], &mut buf)
            .map_err(Error::bus)?;
        Ok(buf[0])
    }

    /// Write consecutive registers, one transaction per register
    pub fn write_regs(&mut self, base_reg: u8, values: &[u8]) -> Result<()> {
        values
            .iter()
            .zip(base_reg..)
            .try_for_each(|(&value, reg)| self.write_reg(reg, value))
    }

    /// Write one byte at a 16-bit memory address
    pub fn write_mem(&mut self, mem: u16, value: u8) -> Result<()> {
        let [hi, lo] = mem.to_be_bytes();
        self.i2c
            .write(self.addr.addr(), &[hi, lo, value])
            .map_err(Error::bus)
    }

    /// Read one byte at a 16-bit memory address (repeated start)
    pub fn read_mem(&mut self, mem: u16) -> Result<u8> {
        let mut buf = [0u8];
        self.i2c
            .write_read(self.addr.addr(), &mem.to_be_bytes(), &mut buf)
            .map_err(Error::bus)?;
        Ok(buf[0])
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}
