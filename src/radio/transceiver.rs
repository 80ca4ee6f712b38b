//! Transceiver Operations
//!
//! Ties the radio state to the hardware: the DDS follows the active VFO
//! slot, the `Si5351A` follows the sideband's LO calibration, the band
//! relays follow the band, and band/VFO choices are written through to
//! the EEPROM as they change. Tuning is volatile until [`save_all`].
//!
//! [`save_all`]: Transceiver::save_all

use heapless::Vec;

use crate::config::{DEFAULT_BAND, DEFAULT_VFO};
use crate::drivers::dds::OperatingSynth;
use crate::drivers::eeprom::ByteStore;
use crate::drivers::encoder::TuningEvent;
use crate::drivers::keypad::KeyCode;
use crate::drivers::si5351::{LocalOscillator, SynthChannel};
use crate::error::Result;
use crate::hal::gpio::BandSwitch;
use crate::types::{Band, Frequency, Sideband, VfoId};

use super::memory::FrequencyStore;
use super::state::{validate_lo, LoOrigin, RadioState};
use super::vfo::SlotOrigin;

/// Multisynth driving the product detector
pub const LO_CHANNEL: SynthChannel = SynthChannel::Ms0;

/// Key code that abandons an LO calibration
pub const CALIBRATION_ABORT: u8 = 6;

/// Key code that stores an LO calibration
pub const CALIBRATION_STORE: u8 = 7;

/// Substitutions made while loading persisted state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    /// Stored band byte, if it was out of range and replaced
    pub band_replaced: Option<u8>,
    /// Stored VFO byte, if it was out of range and replaced
    pub vfo_replaced: Option<u8>,
    /// VFO slots that fell back to their factory default
    pub defaulted_slots: Vec<(Band, VfoId), { Band::COUNT * 2 }>,
    /// Sidebands whose LO value was recomputed
    pub computed_lo: Vec<Sideband, 2>,
}

impl BootReport {
    /// Whether every persisted value was used as stored
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.band_replaced.is_none()
            && self.vfo_replaced.is_none()
            && self.defaulted_slots.is_empty()
            && self.computed_lo.is_empty()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BootReport {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "BootReport(band {}, vfo {}, {} slots defaulted, {} LO computed)",
            self.band_replaced,
            self.vfo_replaced,
            self.defaulted_slots.len(),
            self.computed_lo.len()
        );
    }
}

/// How an LO calibration ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// New value persisted and programmed
    Stored(Frequency),
    /// Previous value restored, nothing persisted
    Aborted,
}

#[cfg(feature = "embedded")]
impl defmt::Format for CalibrationOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Stored(freq) => defmt::write!(f, "Stored({})", freq),
            Self::Aborted => defmt::write!(f, "Aborted"),
        }
    }
}

/// Operator controls polled during a blocking sub-loop
pub trait OperatorInput {
    /// Take the pending encoder rotation
    fn tuning(&mut self) -> Option<TuningEvent>;

    /// Poll the keypad
    fn key(&mut self) -> Option<KeyCode>;
}

/// Transceiver core
///
/// Generic over the operating synthesizer `D`, local oscillator `L`,
/// byte store `S` and band switch `R`.
#[derive(Debug)]
pub struct Transceiver<D, L, S, R> {
    dds: D,
    lo: L,
    store: FrequencyStore<S>,
    relay: R,
    state: RadioState,
}

impl<D, L, S, R> Transceiver<D, L, S, R>
where
    D: OperatingSynth,
    L: LocalOscillator,
    S: ByteStore,
    R: BandSwitch,
{
    /// Create a transceiver in factory state; call [`boot_load`](Self::boot_load) next
    #[must_use]
    pub fn new(dds: D, lo: L, store: S, relay: R) -> Self {
        Self {
            dds,
            lo,
            store: FrequencyStore::new(store),
            relay,
            state: RadioState::new(),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &RadioState {
        &self.state
    }

    /// Persistent store
    pub fn store_mut(&mut self) -> &mut FrequencyStore<S> {
        &mut self.store
    }

    /// Load band, VFO, all 16 VFO slots and both LO values from the store
    ///
    /// Out-of-range values are replaced as described in [`BootReport`].
    /// Both LO values are programmed into the `Si5351A` in sideband order.
    pub fn boot_load(&mut self) -> Result<BootReport> {
        let mut report = BootReport::default();

        let raw_band = self.store.load_last_band()?;
        let band = Band::try_from(raw_band).unwrap_or_else(|_err| {
            #[cfg(feature = "embedded")]
            defmt::debug!("{}, using {}", _err, DEFAULT_BAND);
            report.band_replaced = Some(raw_band);
            DEFAULT_BAND
        });

        let raw_vfo = self.store.load_last_vfo()?;
        let vfo = VfoId::try_from(raw_vfo).unwrap_or_else(|_err| {
            #[cfg(feature = "embedded")]
            defmt::debug!("{}, using {}", _err, DEFAULT_VFO);
            report.vfo_replaced = Some(raw_vfo);
            DEFAULT_VFO
        });

        self.state.set_band(band);
        self.state.set_vfo(vfo);
        self.state.set_sideband(band.preferred_sideband());

        for band in Band::ALL {
            for vfo in VfoId::ALL {
                let stored = self.store.load_frequency(band, vfo)?;
                if self.state.vfos_mut().load(band, vfo, stored) == SlotOrigin::FactoryDefault {
                    #[cfg(feature = "embedded")]
                    defmt::debug!("{} {}: {} out of band, factory default", band, vfo, stored);
                    // Capacity covers every slot
                    let _ = report.defaulted_slots.push((band, vfo));
                }
            }
        }

        for sideband in Sideband::ALL {
            let (lo, origin) = validate_lo(sideband, self.store.load_lo(sideband)?);
            if origin == LoOrigin::Computed {
                #[cfg(feature = "embedded")]
                defmt::debug!("{} LO out of tolerance, using {}", sideband, lo);
                let _ = report.computed_lo.push(sideband);
            }
            self.state.set_lo(sideband, lo);
            self.lo.set_freq(LO_CHANNEL, lo)?;
        }

        #[cfg(feature = "embedded")]
        defmt::info!("boot: {} {} {}, {}", band, vfo, self.state.operating_frequency(), report);

        Ok(report)
    }

    /// Drive relays, LO and DDS to match the current state
    pub fn activate(&mut self) -> Result<()> {
        let band = self.state.band();
        self.relay.select(band)?;
        self.lo.set_freq(LO_CHANNEL, self.state.lo(band.preferred_sideband()))?;
        self.dds.set_frequency(self.state.operating_frequency())
    }

    /// Step one band up (`delta > 0`) or down (`delta < 0`)
    ///
    /// Returns `false` without touching anything at either end of the
    /// band plan or for `delta == 0`. Otherwise retunes the DDS, switches
    /// the relays, moves the LO and sideband to the new band's preferred
    /// sideband and persists the band index.
    pub fn select_band(&mut self, delta: i8) -> Result<bool> {
        let current = self.state.band();
        let target = match delta {
            d if d > 0 => current.next(),
            d if d < 0 => current.prev(),
            _ => None,
        };
        let Some(band) = target else {
            return Ok(false);
        };

        self.state.set_band(band);
        self.dds.set_frequency(self.state.operating_frequency())?;
        self.relay.select(band)?;

        let sideband = band.preferred_sideband();
        self.lo.set_freq(LO_CHANNEL, self.state.lo(sideband))?;
        self.state.set_sideband(sideband);

        self.store.store_last_band(band)?;

        #[cfg(feature = "embedded")]
        defmt::info!("band {} -> {}", current, band);

        Ok(true)
    }

    /// Swap VFO A/B, retune and persist the choice
    pub fn select_vfo(&mut self) -> Result<VfoId> {
        let vfo = self.state.vfo().toggle();
        self.state.set_vfo(vfo);
        self.dds.set_frequency(self.state.operating_frequency())?;
        self.store.store_last_vfo(vfo)?;

        #[cfg(feature = "embedded")]
        defmt::info!("{} at {}", vfo, self.state.operating_frequency());

        Ok(vfo)
    }

    /// Toggle the sideband flag; the LO is left as is
    pub fn select_sideband(&mut self) -> Sideband {
        let sideband = self.state.sideband().toggle();
        self.state.set_sideband(sideband);
        sideband
    }

    /// Shift the active VFO by `delta` Hz and retune
    pub fn apply_tuning(&mut self, delta: i64) -> Result<Frequency> {
        let freq = self.state.tune(delta);
        self.dds.set_frequency(freq)?;
        Ok(freq)
    }

    /// Persist all 16 VFO slots and the current VFO
    pub fn save_all(&mut self) -> Result<()> {
        for (band, vfo, freq) in self.state.vfos().iter() {
            self.store.store_frequency(band, vfo, freq)?;
        }
        self.store.store_last_vfo(self.state.vfo())?;

        #[cfg(feature = "embedded")]
        defmt::info!("all VFOs saved");

        Ok(())
    }

    /// Interactive LO calibration for `sideband`
    ///
    /// Waits for the keypad to be released, then retunes the LO on every
    /// encoder event, reporting each new value through `on_change` (once
    /// up front with the starting value). Key code 6 restores the LO to
    /// the sideband's previous value; code 7 stores the new one. Blocks
    /// until one of the two is pressed.
    pub fn calibrate_lo(
        &mut self,
        sideband: Sideband,
        input: &mut impl OperatorInput,
        mut on_change: impl FnMut(Frequency),
    ) -> Result<CalibrationOutcome> {
        let previous = self.state.lo(sideband);
        let mut trial = previous;
        on_change(trial);

        while input.key().is_some() {}

        loop {
            if let Some(event) = input.tuning() {
                trial = trial.offset(event.delta());
                if let Err(err) = self.lo.set_freq(LO_CHANNEL, trial) {
                    let _ = self.lo.set_freq(LO_CHANNEL, previous);
                    return Err(err);
                }
                on_change(trial);
            }

            match input.key().map(KeyCode::raw) {
                Some(CALIBRATION_ABORT) => {
                    self.lo.set_freq(LO_CHANNEL, previous)?;

                    #[cfg(feature = "embedded")]
                    defmt::info!("{} LO calibration aborted", sideband);

                    return Ok(CalibrationOutcome::Aborted);
                }
                Some(CALIBRATION_STORE) => {
                    self.state.set_lo(sideband, trial);
                    self.store.store_lo(sideband, trial)?;
                    self.lo.set_freq(LO_CHANNEL, trial)?;

                    #[cfg(feature = "embedded")]
                    defmt::info!("{} LO stored at {}", sideband, trial);

                    return Ok(CalibrationOutcome::Stored(trial));
                }
                _ => {}
            }
        }
    }

    /// Release the hardware
    pub fn release(self) -> (D, L, S, R) {
        (self.dds, self.lo, self.store.release(), self.relay)
    }
}
