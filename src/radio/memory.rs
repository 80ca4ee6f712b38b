//! Persistent Frequency Layout
//!
//! Fixed byte map on the EEPROM:
//!
//! | Address | Content |
//! |---|---|
//! | `128 + band*8 + vfo*4` | VFO frequency, 4 bytes big-endian |
//! | `128 + 8*8 + sideband*4` | LO calibration, 4 bytes big-endian |
//! | `256` | last band index |
//! | `257` | last VFO index |

use crate::config::store::{BAND_STRIDE, FIELD_SIZE, LAST_BAND, LAST_VFO, LO_BAND_SLOT, VFO_BASE};
use crate::drivers::eeprom::ByteStore;
use crate::error::Result;
use crate::types::{Band, Frequency, Sideband, VfoId};

/// Address of the 4-byte field for `slot` (band index, or 8 for the LO pair)
#[must_use]
pub const fn field_address(slot: u8, index: usize) -> u16 {
    VFO_BASE + index as u16 * FIELD_SIZE + slot as u16 * BAND_STRIDE
}

/// Typed view over a [`ByteStore`]
#[derive(Debug)]
pub struct FrequencyStore<S> {
    store: S,
}

impl<S: ByteStore> FrequencyStore<S> {
    /// Wrap a byte store
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    fn read_field(&mut self, addr: u16) -> Result<u32> {
        let mut bytes = [0u8; 4];
        for (offset, byte) in (0u16..).zip(bytes.iter_mut()) {
            *byte = self.store.read(addr + offset)?;
        }
        Ok(u32::from_be_bytes(bytes))
    }

    fn write_field(&mut self, addr: u16, value: u32) -> Result<()> {
        for (offset, byte) in (0u16..).zip(value.to_be_bytes()) {
            self.store.write(addr + offset, byte)?;
        }
        Ok(())
    }

    /// Read a VFO frequency exactly as stored
    pub fn load_frequency(&mut self, band: Band, vfo: VfoId) -> Result<Frequency> {
        self.read_field(field_address(band as u8, vfo.index()))
            .map(Frequency::from_hz)
    }

    /// Write a VFO frequency
    pub fn store_frequency(&mut self, band: Band, vfo: VfoId, freq: Frequency) -> Result<()> {
        self.write_field(field_address(band as u8, vfo.index()), freq.as_hz())
    }

    /// Read a sideband's LO value exactly as stored
    pub fn load_lo(&mut self, sideband: Sideband) -> Result<Frequency> {
        self.read_field(field_address(LO_BAND_SLOT, sideband.index()))
            .map(Frequency::from_hz)
    }

    /// Write a sideband's LO value
    pub fn store_lo(&mut self, sideband: Sideband, freq: Frequency) -> Result<()> {
        self.write_field(field_address(LO_BAND_SLOT, sideband.index()), freq.as_hz())
    }

    /// Raw last-band byte (may be out of range)
    pub fn load_last_band(&mut self) -> Result<u8> {
        self.store.read(LAST_BAND)
    }

    /// Remember the current band
    pub fn store_last_band(&mut self, band: Band) -> Result<()> {
        self.store.write(LAST_BAND, band as u8)
    }

    /// Raw last-VFO byte (may be out of range)
    pub fn load_last_vfo(&mut self) -> Result<u8> {
        self.store.read(LAST_VFO)
    }

    /// Remember the current VFO
    pub fn store_last_vfo(&mut self, vfo: VfoId) -> Result<()> {
        self.store.write(LAST_VFO, vfo.index() as u8)
    }

    /// Underlying byte store
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Release the byte store
    pub fn release(self) -> S {
        self.store
    }
}
