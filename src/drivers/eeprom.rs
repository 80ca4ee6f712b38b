//! 24C65 I2C EEPROM Driver
//!
//! 8 KiB serial EEPROM with 16-bit memory addressing. Every byte access
//! is its own bus transaction followed by a fixed settle delay, which
//! covers the internal write cycle without polling for ACK.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::{EEPROM_SETTLE_MS, EEPROM_SIZE};
use crate::error::{Error, Result};
use crate::hal::i2c::{I2cAddress, I2cBus};

/// Byte-addressable non-volatile memory
pub trait ByteStore {
    /// Read the byte at `addr`
    fn read(&mut self, addr: u16) -> Result<u8>;

    /// Write `value` at `addr`
    fn write(&mut self, addr: u16, value: u8) -> Result<()>;
}

impl<T: ByteStore + ?Sized> ByteStore for &mut T {
    fn read(&mut self, addr: u16) -> Result<u8> {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        (**self).write(addr, value)
    }
}

/// 24C65 driver
#[derive(Debug)]
pub struct Eeprom<I2C, D> {
    bus: I2cBus<I2C>,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> Eeprom<I2C, D> {
    /// Create a driver at the default address
    #[must_use]
    pub const fn new(i2c: I2C, delay: D) -> Self {
        Self {
            bus: I2cBus::new(i2c, I2cAddress::EEPROM),
            delay,
        }
    }

    fn check(addr: u16) -> Result<()> {
        if addr < EEPROM_SIZE {
            Ok(())
        } else {
            Err(Error::AddressOutOfRange(addr))
        }
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.bus.release(), self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> ByteStore for Eeprom<I2C, D> {
    fn read(&mut self, addr: u16) -> Result<u8> {
        Self::check(addr)?;
        let value = self.bus.read_mem(addr)?;
        self.delay.delay_ms(EEPROM_SETTLE_MS);
        Ok(value)
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        Self::check(addr)?;
        self.bus.write_mem(addr, value)?;
        self.delay.delay_ms(EEPROM_SETTLE_MS);
        Ok(())
    }
}
