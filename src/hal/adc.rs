//! ADC Channels
//!
//! The core reads four single-ended 12-bit channels through a blocking
//! one-shot conversion. The board implementation owns the ADC and pins.

use crate::config::ADC_MAX;

/// Analog inputs consumed by the control core
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdcChannel {
    /// Keypad resistor ladder
    Keypad,
    /// Supply voltage divider
    Supply,
    /// S-meter / RF power detector
    Meter,
    /// PA temperature sensor divider
    Temperature,
}

impl AdcChannel {
    /// ADC1 input number on the board
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Keypad => 4,
            Self::Supply => 5,
            Self::Meter => 6,
            Self::Temperature => 7,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AdcChannel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC_IN{}", self.number());
    }
}

/// Blocking single-conversion analog input
pub trait AnalogInput {
    /// Convert one sample on `channel` (0-4095)
    fn read_channel(&mut self, channel: AdcChannel) -> u16;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_channel(&mut self, channel: AdcChannel) -> u16 {
        (**self).read_channel(channel)
    }
}

/// ADC reading result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdcReading {
    /// Raw 12-bit ADC value (0-4095)
    raw: u16,
}

impl AdcReading {
    /// Create a new ADC reading from raw value
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self {
            raw: if raw > ADC_MAX { ADC_MAX } else { raw },
        }
    }

    /// Get the raw 12-bit value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Convert to voltage (assuming 3.3V reference)
    #[must_use]
    pub fn as_voltage(self) -> f32 {
        (f32::from(self.raw) / 4096.0) * 3.3
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({})", self.raw);
    }
}
