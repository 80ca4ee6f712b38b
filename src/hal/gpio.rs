//! GPIO Abstractions
//!
//! Type-safe wrappers for the band relay lines and the TX/RX status input.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::{Error, Result};
use crate::types::{Band, TxRxState};

/// Band filter switching
pub trait BandSwitch {
    /// Route the signal path through the filters for `band`
    fn select(&mut self, band: Band) -> Result<()>;
}

/// Band relay selector
///
/// Drives the 8 band relays through a 3-line binary decoder.
#[derive(Debug)]
pub struct BandRelay<P0, P1, P2> {
    sel0: P0,
    sel1: P1,
    sel2: P2,
    current: Option<Band>,
}

impl<P0: OutputPin, P1: OutputPin, P2: OutputPin> BandRelay<P0, P1, P2> {
    /// Create band relay control (no band selected yet)
    #[must_use]
    pub const fn new(sel0: P0, sel1: P1, sel2: P2) -> Self {
        Self {
            sel0,
            sel1,
            sel2,
            current: None,
        }
    }

    /// Currently selected band
    #[must_use]
    pub const fn current(&self) -> Option<Band> {
        self.current
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    if high {
        pin.set_high().map_err(Error::pin)
    } else {
        pin.set_low().map_err(Error::pin)
    }
}

impl<P0: OutputPin, P1: OutputPin, P2: OutputPin> BandSwitch for BandRelay<P0, P1, P2> {
    fn select(&mut self, band: Band) -> Result<()> {
        let bits = band.relay_bits();
        drive(&mut self.sel0, bits & 0x01 != 0)?;
        drive(&mut self.sel1, bits & 0x02 != 0)?;
        drive(&mut self.sel2, bits & 0x04 != 0)?;
        self.current = Some(band);
        Ok(())
    }
}

/// TX/RX status input (active low: pulled to ground while transmitting)
#[derive(Debug)]
pub struct TxRxSense<P> {
    pin: P,
}

impl<P: InputPin> TxRxSense<P> {
    /// Create the status input
    #[must_use]
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Sample the current state
    pub fn state(&mut self) -> Result<TxRxState> {
        if self.pin.is_low().map_err(Error::pin)? {
            Ok(TxRxState::Tx)
        } else {
            Ok(TxRxState::Rx)
        }
    }
}
