//! Analog Readouts
//!
//! Supply voltage, PA temperature and signal level, converted from raw
//! 12-bit ADC samples into the values the display shows.

#[cfg(not(feature = "std"))]
use micromath::F32Ext;

use crate::hal::adc::AdcReading;

/// Supply voltage divider: tenths of a volt per ADC count
const SUPPLY_TENTHS_PER_COUNT: f32 = 0.088_623_046_875;

/// KTY81-210 resistance at 0 °C
const KTY_R0_OHMS: f32 = 1630.0;

/// KTY81-210 slope around room temperature
const KTY_OHMS_PER_DEGREE: f32 = 17.62;

/// Fixed resistor of the sensor divider
const KTY_DIVIDER_OHMS: f32 = 1000.0;

/// Upper end of the meter scale
pub const METER_MAX: u8 = 120;

/// Supply voltage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplyVoltage {
    tenths: u16,
}

impl SupplyVoltage {
    /// Convert a supply channel sample
    #[must_use]
    pub fn from_reading(reading: AdcReading) -> Self {
        let tenths = (f32::from(reading.raw()) * SUPPLY_TENTHS_PER_COUNT).trunc();
        Self {
            tenths: tenths as u16,
        }
    }

    /// Voltage in tenths of a volt (e.g. 138 = 13.8 V)
    #[must_use]
    pub const fn tenths(self) -> u16 {
        self.tenths
    }

    /// Voltage in volts
    #[must_use]
    pub fn volts(self) -> f32 {
        f32::from(self.tenths) / 10.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SupplyVoltage {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}.{} V", self.tenths / 10, self.tenths % 10);
    }
}

/// PA heatsink temperature
///
/// The sensor is the low side of a divider with a 1 kΩ resistor to
/// 3.3 V. A zero reading means a shorted sensor and maps to the bottom
/// of the scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaTemperature {
    celsius: i16,
}

impl PaTemperature {
    /// Convert a temperature channel sample
    #[must_use]
    pub fn from_reading(reading: AdcReading) -> Self {
        let ux = reading.as_voltage();
        let rx = if reading.raw() == 0 {
            0.0
        } else {
            KTY_DIVIDER_OHMS / (3.3 / ux - 1.0)
        };
        let celsius = ((rx - KTY_R0_OHMS) / KTY_OHMS_PER_DEGREE).trunc();
        Self {
            celsius: celsius as i16,
        }
    }

    /// Temperature in whole degrees Celsius
    #[must_use]
    pub const fn celsius(self) -> i16 {
        self.celsius
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PaTemperature {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} C", self.celsius);
    }
}

/// S-meter / power meter level (0-120)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalLevel(u8);

impl SignalLevel {
    /// Convert a meter channel sample
    #[must_use]
    pub fn from_reading(reading: AdcReading) -> Self {
        let level = (reading.raw() >> 4).min(u16::from(METER_MAX));
        Self(level as u8)
    }

    /// Bar length on the meter scale
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SignalLevel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "S{}", self.0);
    }
}
