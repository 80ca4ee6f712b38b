//! Radio State
//!
//! The process-wide operating state, owned by the transceiver and
//! mutated only from the control loop.

use crate::config::{DEFAULT_BAND, DEFAULT_VFO, INTERMEDIATE_FREQUENCY_HZ, LO_TOLERANCE_HZ};
use crate::types::{Band, Frequency, Sideband, VfoId};

use super::vfo::VfoBank;

/// Where a sideband's LO calibration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoOrigin {
    /// The stored value was within tolerance of the IF
    Stored,
    /// The stored value was rejected and the default offset used
    Computed,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LoOrigin {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Stored => defmt::write!(f, "stored"),
            Self::Computed => defmt::write!(f, "computed"),
        }
    }
}

/// Nominal LO for a sideband: the IF offset by half the tolerance
#[must_use]
pub fn default_lo(sideband: Sideband) -> Frequency {
    let half = i64::from(LO_TOLERANCE_HZ / 2);
    Frequency::from_hz(INTERMEDIATE_FREQUENCY_HZ).offset(sideband.lo_offset_sign() * half)
}

/// Accept `stored` if it lies within tolerance of the IF
#[must_use]
pub fn validate_lo(sideband: Sideband, stored: Frequency) -> (Frequency, LoOrigin) {
    if stored.abs_diff(Frequency::from_hz(INTERMEDIATE_FREQUENCY_HZ)) <= LO_TOLERANCE_HZ {
        (stored, LoOrigin::Stored)
    } else {
        (default_lo(sideband), LoOrigin::Computed)
    }
}

/// Complete operating state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadioState {
    band: Band,
    vfo: VfoId,
    sideband: Sideband,
    vfos: VfoBank,
    lo: [Frequency; 2],
}

impl RadioState {
    /// Factory state: default band and VFO, factory frequencies, nominal LOs
    #[must_use]
    pub fn new() -> Self {
        Self {
            band: DEFAULT_BAND,
            vfo: DEFAULT_VFO,
            sideband: DEFAULT_BAND.preferred_sideband(),
            vfos: VfoBank::factory(),
            lo: Sideband::ALL.map(default_lo),
        }
    }

    /// Current band
    #[must_use]
    pub const fn band(&self) -> Band {
        self.band
    }

    /// Current VFO
    #[must_use]
    pub const fn vfo(&self) -> VfoId {
        self.vfo
    }

    /// Current sideband
    #[must_use]
    pub const fn sideband(&self) -> Sideband {
        self.sideband
    }

    /// All VFO slots
    #[must_use]
    pub const fn vfos(&self) -> &VfoBank {
        &self.vfos
    }

    /// All VFO slots, mutably
    pub fn vfos_mut(&mut self) -> &mut VfoBank {
        &mut self.vfos
    }

    /// LO calibration value for a sideband
    #[must_use]
    pub const fn lo(&self, sideband: Sideband) -> Frequency {
        self.lo[sideband.index()]
    }

    /// Frequency of the active VFO slot
    #[must_use]
    pub const fn operating_frequency(&self) -> Frequency {
        self.vfos.get(self.band, self.vfo)
    }

    /// Select a band
    pub fn set_band(&mut self, band: Band) {
        self.band = band;
    }

    /// Select a VFO
    pub fn set_vfo(&mut self, vfo: VfoId) {
        self.vfo = vfo;
    }

    /// Select a sideband
    pub fn set_sideband(&mut self, sideband: Sideband) {
        self.sideband = sideband;
    }

    /// Replace a sideband's LO value
    pub fn set_lo(&mut self, sideband: Sideband, freq: Frequency) {
        self.lo[sideband.index()] = freq;
    }

    /// Shift the active VFO slot by `delta` Hz and return the new frequency
    ///
    /// The result is not limited to the band.
    pub fn tune(&mut self, delta: i64) -> Frequency {
        let freq = self.operating_frequency().offset(delta);
        self.vfos.set(self.band, self.vfo, freq);
        freq
    }
}

impl Default for RadioState {
    fn default() -> Self {
        Self::new()
    }
}
