//! AD9951 Direct Digital Synthesizer Driver
//!
//! Generates the operating (VFO) frequency. The receiver mixes against
//! the intermediate frequency, so the DDS always runs at `f_rf + IF`.
//!
//! A frequency update is one serial instruction byte (register address
//! of the frequency tuning word) followed by the 32-bit word MSB first,
//! framed by the I/O update strobe: low during the transfer, high after
//! to latch the new word into the DDS core.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{DDS_CLOCK_HZ, DDS_RESET_HOLD_MS, DDS_SET_FREQUENCY_OPCODE, INTERMEDIATE_FREQUENCY_HZ};
use crate::error::{Error, Result};
use crate::hal::serial::SerialWrite;
use crate::types::Frequency;

/// Synthesizer producing the operating frequency
pub trait OperatingSynth {
    /// Tune to the RF frequency `freq` (IF offset applied internally)
    fn set_frequency(&mut self, freq: Frequency) -> Result<()>;
}

/// Compute the 32-bit frequency tuning word for an RF frequency
///
/// `FTW = (f_rf + IF) * 2^32 / f_clock`, truncated. The result wraps
/// like the hardware register does for outputs above the clock rate.
#[must_use]
pub const fn tuning_word(freq: Frequency) -> u32 {
    let f_out = freq.as_hz() as u128 + INTERMEDIATE_FREQUENCY_HZ as u128;
    ((f_out << 32) / DDS_CLOCK_HZ as u128) as u32
}

/// AD9951 driver
#[derive(Debug)]
pub struct Ad9951<S, UD, RST> {
    serial: S,
    io_update: UD,
    reset: RST,
    last_word: Option<u32>,
}

impl<S, UD, RST> Ad9951<S, UD, RST>
where
    S: SerialWrite,
    UD: OutputPin,
    RST: OutputPin,
{
    /// Create a new driver from the serial link, I/O update and reset lines
    #[must_use]
    pub const fn new(serial: S, io_update: UD, reset: RST) -> Self {
        Self {
            serial,
            io_update,
            reset,
            last_word: None,
        }
    }

    /// Pulse the reset line the way the chip expects at power-up
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<()> {
        self.reset.set_high().map_err(Error::pin)?;
        delay.delay_ms(DDS_RESET_HOLD_MS);
        self.reset.set_low().map_err(Error::pin)?;
        delay.delay_ms(DDS_RESET_HOLD_MS);
        self.reset.set_high().map_err(Error::pin)?;
        self.last_word = None;
        Ok(())
    }

    /// Last tuning word sent to the chip
    #[must_use]
    pub const fn last_word(&self) -> Option<u32> {
        self.last_word
    }

    /// Transmit a raw tuning word
    ///
    /// IO_UD returns high even when the frame fails.
    pub fn write_tuning_word(&mut self, word: u32) -> Result<()> {
        self.io_update.set_low().map_err(Error::pin)?;
        let sent = self
            .serial
            .send_byte(DDS_SET_FREQUENCY_OPCODE)
            .and_then(|()| self.serial.send(&word.to_be_bytes()));
        let latched = self.io_update.set_high().map_err(Error::pin);
        sent.and(latched)?;
        self.last_word = Some(word);
        Ok(())
    }

    /// Release the serial link and control lines
    pub fn release(self) -> (S, UD, RST) {
        (self.serial, self.io_update, self.reset)
    }
}

impl<S, UD, RST> OperatingSynth for Ad9951<S, UD, RST>
where
    S: SerialWrite,
    UD: OutputPin,
    RST: OutputPin,
{
    fn set_frequency(&mut self, freq: Frequency) -> Result<()> {
        self.write_tuning_word(tuning_word(freq))
    }
}
