//! Shared types used across the transceiver firmware
//!
//! This module defines domain-specific types for bands, VFOs and
//! sidebands so that indices read from storage or decoded from keys
//! are validated once, at the boundary.

use core::fmt;

use crate::error::Error;

/// Frequency in Hertz
///
/// Unlike a band-limited value, a VFO frequency may leave its band while
/// the operator tunes, so any `u32` is representable. Band validity is
/// checked with [`Band::contains`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Frequency(u32);

impl Frequency {
    /// Create a frequency from Hz
    #[must_use]
    pub const fn from_hz(hz: u32) -> Self {
        Self(hz)
    }

    /// Create a frequency from kHz (saturating)
    #[must_use]
    pub const fn from_khz(khz: u32) -> Self {
        Self(khz.saturating_mul(1000))
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        self.0
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0 / 1000
    }

    /// Shift by a signed amount, saturating at the representable range
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        let hz = i64::from(self.0).saturating_add(delta);
        Self(hz.clamp(0, i64::from(u32::MAX)) as u32)
    }

    /// Distance to another frequency in Hz
    #[must_use]
    pub const fn abs_diff(self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} Hz)", self.0)
    }
}

impl From<u32> for Frequency {
    fn from(hz: u32) -> Self {
        Self(hz)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.0);
    }
}

/// Sideband selection
///
/// Also indexes the two LO calibration values (LSB = 0, USB = 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Sideband {
    /// Lower sideband
    #[default]
    Lsb,
    /// Upper sideband
    Usb,
}

impl Sideband {
    /// Both sidebands in storage order
    pub const ALL: [Self; 2] = [Self::Lsb, Self::Usb];

    /// Storage / array index
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Lsb => 0,
            Self::Usb => 1,
        }
    }

    /// Sideband from its index
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Lsb),
            1 => Some(Self::Usb),
            _ => None,
        }
    }

    /// The other sideband
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Lsb => Self::Usb,
            Self::Usb => Self::Lsb,
        }
    }

    /// Sign of the default LO offset from the IF (-1 for LSB, +1 for USB)
    #[must_use]
    pub const fn lo_offset_sign(self) -> i64 {
        match self {
            Self::Lsb => -1,
            Self::Usb => 1,
        }
    }

    /// Short label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lsb => "LSB",
            Self::Usb => "USB",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Sideband {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// VFO A/B selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VfoId {
    /// VFO A
    #[default]
    A,
    /// VFO B
    B,
}

impl VfoId {
    /// Both VFOs in storage order
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Storage / array index
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// VFO from its index
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::A),
            1 => Some(Self::B),
            _ => None,
        }
    }

    /// Toggle VFO selection
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl TryFrom<u8> for VfoId {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Error> {
        Self::from_index(index).ok_or(Error::InvalidVfo(index))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VfoId {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::A => defmt::write!(f, "VFO-A"),
            Self::B => defmt::write!(f, "VFO-B"),
        }
    }
}

/// Amateur radio band definition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    /// 160 meters (1.81 - 2.0 MHz)
    M160,
    /// 80 meters (3.5 - 3.8 MHz)
    M80,
    /// 40 meters (7.0 - 7.2 MHz)
    M40,
    /// 20 meters (14.0 - 14.35 MHz)
    M20,
    /// 17 meters (18.065 - 18.165 MHz)
    M17,
    /// 15 meters (21.0 - 21.465 MHz)
    M15,
    /// 12 meters (24.89 - 24.99 MHz)
    M12,
    /// 10 meters (28.0 - 29.7 MHz)
    M10,
}

impl Band {
    /// Number of bands
    pub const COUNT: usize = 8;

    /// All bands in index order
    pub const ALL: [Self; Self::COUNT] = [
        Self::M160,
        Self::M80,
        Self::M40,
        Self::M20,
        Self::M17,
        Self::M15,
        Self::M12,
        Self::M10,
    ];

    /// Band index (0-7)
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Band from its index, `None` outside 0-7
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Next band up, `None` at the top of the plan
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self as u8 + 1)
    }

    /// Next band down, `None` at the bottom of the plan
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self.index() {
            0 => None,
            i => Some(Self::ALL[i - 1]),
        }
    }

    /// Lower band edge in Hz
    #[must_use]
    pub const fn lower_hz(self) -> u32 {
        match self {
            Self::M160 => 1_810_000,
            Self::M80 => 3_500_000,
            Self::M40 => 7_000_000,
            Self::M20 => 14_000_000,
            Self::M17 => 18_065_000,
            Self::M15 => 21_000_000,
            Self::M12 => 24_890_000,
            Self::M10 => 28_000_000,
        }
    }

    /// Upper band edge in Hz
    #[must_use]
    pub const fn upper_hz(self) -> u32 {
        match self {
            Self::M160 => 2_000_000,
            Self::M80 => 3_800_000,
            Self::M40 => 7_200_000,
            Self::M20 => 14_350_000,
            Self::M17 => 18_165_000,
            Self::M15 => 21_465_000,
            Self::M12 => 24_990_000,
            Self::M10 => 29_700_000,
        }
    }

    /// Band center in Hz
    #[must_use]
    pub const fn center_hz(self) -> u32 {
        match self {
            Self::M160 => 1_840_000,
            Self::M80 => 3_650_000,
            Self::M40 => 7_120_000,
            Self::M20 => 14_180_000,
            Self::M17 => 18_100_000,
            Self::M15 => 21_290_000,
            Self::M12 => 24_931_000,
            Self::M10 => 28_500_000,
        }
    }

    /// Conventional sideband for voice on this band
    #[must_use]
    pub const fn preferred_sideband(self) -> Sideband {
        match self {
            Self::M160 | Self::M80 | Self::M40 => Sideband::Lsb,
            Self::M20 | Self::M17 | Self::M15 | Self::M12 | Self::M10 => Sideband::Usb,
        }
    }

    /// Compiled-in frequency for a VFO slot whose stored value is unusable
    #[must_use]
    pub const fn factory_default(self, vfo: VfoId) -> Frequency {
        let (a, b) = match self {
            Self::M160 => (1_888_000, 1_961_000),
            Self::M80 => (3_650_000, 3_650_000),
            Self::M40 => (7_120_000, 7_120_000),
            Self::M20 => (14_200_000, 14_280_000),
            Self::M17 => (18_080_000, 18_150_000),
            Self::M15 => (21_290_000, 21_390_000),
            Self::M12 => (24_910_000, 24_912_000),
            Self::M10 => (28_500_000, 28_590_000),
        };
        match vfo {
            VfoId::A => Frequency::from_hz(a),
            VfoId::B => Frequency::from_hz(b),
        }
    }

    /// Check `lower <= f <= upper`
    #[must_use]
    pub const fn contains(self, freq: Frequency) -> bool {
        let hz = freq.as_hz();
        hz >= self.lower_hz() && hz <= self.upper_hz()
    }

    /// Bit pattern driven onto the three band relay lines
    #[must_use]
    pub const fn relay_bits(self) -> u8 {
        self as u8 & 0x07
    }

    /// Band name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::M160 => "160m",
            Self::M80 => "80m",
            Self::M40 => "40m",
            Self::M20 => "20m",
            Self::M17 => "17m",
            Self::M15 => "15m",
            Self::M12 => "12m",
            Self::M10 => "10m",
        }
    }
}

impl TryFrom<u8> for Band {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Error> {
        Self::from_index(index).ok_or(Error::InvalidBand(index))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.name());
    }
}

/// Transmit/Receive state as read from the status input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TxRxState {
    /// Receiving
    #[default]
    Rx,
    /// Transmitting
    Tx,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxRxState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Rx => defmt::write!(f, "RX"),
            Self::Tx => defmt::write!(f, "TX"),
        }
    }
}
