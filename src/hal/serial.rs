//! Bit-banged serial output
//!
//! Clocked, MSB-first byte writer shared by the DDS link. The receiving
//! chip latches data on the rising clock edge, so no inter-bit delay is
//! inserted beyond the pin toggles themselves.
//!
//! Not reentrant: exactly one owner drives a given pair of lines.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};

/// Byte-oriented serial write primitive
pub trait SerialWrite {
    /// Shift one byte out, MSB first
    fn send_byte(&mut self, value: u8) -> Result<()>;

    /// Shift a sequence of bytes out in order
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        bytes.iter().try_for_each(|&b| self.send_byte(b))
    }
}

/// Two-wire (clock + data) bit-banged writer
#[derive(Debug)]
pub struct BitBangSerial<CLK, DATA> {
    clock: CLK,
    data: DATA,
}

impl<CLK: OutputPin, DATA: OutputPin> BitBangSerial<CLK, DATA> {
    /// Create a writer from the clock and data lines
    #[must_use]
    pub const fn new(clock: CLK, data: DATA) -> Self {
        Self { clock, data }
    }

    /// Release the pins
    pub fn release(self) -> (CLK, DATA) {
        (self.clock, self.data)
    }
}

impl<CLK: OutputPin, DATA: OutputPin> SerialWrite for BitBangSerial<CLK, DATA> {
    fn send_byte(&mut self, value: u8) -> Result<()> {
        for bit in (0..8).rev() {
            self.clock.set_low().map_err(Error::pin)?;

            if value & (1 << bit) != 0 {
                self.data.set_high().map_err(Error::pin)?;
            } else {
                self.data.set_low().map_err(Error::pin)?;
            }

            self.clock.set_high().map_err(Error::pin)?;
        }
        Ok(())
    }
}
