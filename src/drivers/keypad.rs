//! Resistor-Ladder Keypad Decoder
//!
//! Six keys share one ADC input through a resistor ladder. A press is
//! sampled until release, the samples are averaged, and the mean is
//! matched against the nominal tap voltages. Holding a key for
//! `LONG_PRESS_TICKS` or more turns key `k` into code `k + 6`.

use crate::config::{KEYPAD_LEVELS, KEYPAD_RELEASED_THRESHOLD, KEYPAD_TOLERANCE, LONG_PRESS_TICKS};
use crate::drivers::encoder::TimeBase;
use crate::hal::adc::{AdcChannel, AnalogInput};

/// Number of physical keys on the ladder
pub const KEY_COUNT: u8 = 6;

/// Decoded key code (0-5 short press, 6-11 long press)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyCode(u8);

impl KeyCode {
    /// Short press of key `key`
    #[must_use]
    pub const fn short(key: u8) -> Self {
        Self(key)
    }

    /// Long press of key `key`
    #[must_use]
    pub const fn long(key: u8) -> Self {
        Self(key + KEY_COUNT)
    }

    /// Physical key index (0-5)
    #[must_use]
    pub const fn key(self) -> u8 {
        self.0 % KEY_COUNT
    }

    /// Whether the key was held
    #[must_use]
    pub const fn is_long(self) -> bool {
        self.0 >= KEY_COUNT
    }

    /// Raw code as dispatched by the control loop
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyCode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Key({})", self.0);
    }
}

/// Match an averaged ladder reading to a key code
///
/// Windows are open intervals `(level - tol, level + tol)`; the first
/// matching tap wins.
#[must_use]
pub fn classify(mean: u16, held_ticks: u32) -> Option<KeyCode> {
    let key = KEYPAD_LEVELS.iter().position(|&level| {
        mean > level.saturating_sub(KEYPAD_TOLERANCE) && mean < level + KEYPAD_TOLERANCE
    })? as u8;

    if held_ticks < LONG_PRESS_TICKS {
        Some(KeyCode::short(key))
    } else {
        Some(KeyCode::long(key))
    }
}

/// Blocking keypad reader
#[derive(Debug, Default)]
pub struct KeypadDecoder {
    last_match: Option<u32>,
}

impl KeypadDecoder {
    /// Create a decoder
    #[must_use]
    pub const fn new() -> Self {
        Self { last_match: None }
    }

    /// Sample the keypad
    ///
    /// Returns `None` immediately when no key is down. Otherwise blocks
    /// until the key is released and returns the decoded code, or `None`
    /// if the averaged reading matches no tap.
    pub fn poll(&mut self, adc: &mut impl AnalogInput, time: &impl TimeBase) -> Option<KeyCode> {
        if adc.read_channel(AdcChannel::Keypad) > KEYPAD_RELEASED_THRESHOLD {
            return None;
        }

        let start = time.ticks();
        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        loop {
            let sample = adc.read_channel(AdcChannel::Keypad);
            if sample > KEYPAD_RELEASED_THRESHOLD {
                break;
            }
            sum += u64::from(sample);
            count += 1;
        }

        // Released between the first and second sample
        if count == 0 {
            return None;
        }

        let held = time.ticks().wrapping_sub(start);
        let code = classify((sum / count) as u16, held)?;
        self.last_match = Some(time.ticks());

        #[cfg(feature = "embedded")]
        defmt::trace!("keypad: {} after {} ticks", code, held);

        Some(code)
    }

    /// Tick at which the last key was recognized
    #[must_use]
    pub const fn last_match(&self) -> Option<u32> {
        self.last_match
    }
}
