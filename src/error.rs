//! Crate error type
//!
//! Bus and pin failures from the `embedded-hal` implementations are
//! collapsed into one enum; the concrete HAL error is not kept since no
//! caller can act on it beyond reporting.

use thiserror::Error;

/// Result alias used by all drivers
pub type Result<T> = core::result::Result<T, Error>;

/// Firmware error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// An I2C transaction was not acknowledged or aborted
    #[error("I2C bus transaction failed")]
    Bus,
    /// A GPIO read or write failed
    #[error("GPIO pin access failed")]
    Pin,
    /// A band index outside the band plan
    #[error("band index {0} out of range")]
    InvalidBand(u8),
    /// A VFO index other than 0 or 1
    #[error("VFO index {0} out of range")]
    InvalidVfo(u8),
    /// Multisynth divider outside the range the `Si5351A` accepts
    #[error("{0} Hz cannot be synthesized")]
    Unsynthesizable(u32),
    /// Memory address beyond the end of the EEPROM
    #[error("EEPROM address {0:#06x} out of range")]
    AddressOutOfRange(u16),
}

impl Error {
    /// Map any I2C error to [`Error::Bus`]
    pub fn bus<E: embedded_hal::i2c::Error>(_: E) -> Self {
        Self::Bus
    }

    /// Map any digital I/O error to [`Error::Pin`]
    pub fn pin<E: embedded_hal::digital::Error>(_: E) -> Self {
        Self::Pin
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus => defmt::write!(f, "Bus"),
            Self::Pin => defmt::write!(f, "Pin"),
            Self::InvalidBand(b) => defmt::write!(f, "InvalidBand({})", b),
            Self::InvalidVfo(v) => defmt::write!(f, "InvalidVfo({})", v),
            Self::Unsynthesizable(hz) => defmt::write!(f, "Unsynthesizable({} Hz)", hz),
            Self::AddressOutOfRange(a) => defmt::write!(f, "AddressOutOfRange(0x{:04X})", a),
        }
    }
}
