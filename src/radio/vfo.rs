//! VFO Bank
//!
//! Two independently tunable frequency memories per band. Values read
//! back from storage are validated against their band's edges; anything
//! outside is replaced by the band's factory default and reported as
//! such.

use crate::types::{Band, Frequency, VfoId};

/// Where a VFO slot's boot value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotOrigin {
    /// The stored value was inside the band
    Stored,
    /// The stored value was rejected and the factory default used
    FactoryDefault,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SlotOrigin {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Stored => defmt::write!(f, "stored"),
            Self::FactoryDefault => defmt::write!(f, "factory"),
        }
    }
}

/// Accept `stored` if it lies inside `band`, else fall back to the default
#[must_use]
pub const fn validate_slot(band: Band, vfo: VfoId, stored: Frequency) -> (Frequency, SlotOrigin) {
    if band.contains(stored) {
        (stored, SlotOrigin::Stored)
    } else {
        (band.factory_default(vfo), SlotOrigin::FactoryDefault)
    }
}

/// 8 x 2 matrix of VFO frequencies
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VfoBank {
    slots: [[Frequency; 2]; Band::COUNT],
}

impl VfoBank {
    /// Bank holding the factory default of every slot
    #[must_use]
    pub fn factory() -> Self {
        let mut slots = [[Frequency::default(); 2]; Band::COUNT];
        for band in Band::ALL {
            for vfo in VfoId::ALL {
                slots[band.index()][vfo.index()] = band.factory_default(vfo);
            }
        }
        Self { slots }
    }

    /// Frequency of one slot
    #[must_use]
    pub const fn get(&self, band: Band, vfo: VfoId) -> Frequency {
        self.slots[band.index()][vfo.index()]
    }

    /// Overwrite one slot without validation (tuning may leave the band)
    pub fn set(&mut self, band: Band, vfo: VfoId, freq: Frequency) {
        self.slots[band.index()][vfo.index()] = freq;
    }

    /// Store a value read back from memory, validating it first
    pub fn load(&mut self, band: Band, vfo: VfoId, stored: Frequency) -> SlotOrigin {
        let (freq, origin) = validate_slot(band, vfo, stored);
        self.set(band, vfo, freq);
        origin
    }

    /// All slots in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Band, VfoId, Frequency)> + '_ {
        Band::ALL
            .into_iter()
            .flat_map(|band| VfoId::ALL.into_iter().map(move |vfo| (band, vfo)))
            .map(|(band, vfo)| (band, vfo, self.get(band, vfo)))
    }
}

impl Default for VfoBank {
    fn default() -> Self {
        Self::factory()
    }
}
