//! `Si5351A` Clock Synthesizer Driver
//!
//! Provides the local oscillator for the transceiver's product detector.
//!
//! PLL A runs as an integer multiple of the 25 MHz crystal (VCO =
//! 800 MHz). Each output multisynth then divides the VCO down with a
//! fractional divider `a + b/c`, with `c` fixed at the 20-bit maximum so
//! the LO can be trimmed in sub-Hz steps during calibration.
//!
//! # Register encoding (AN619)
//!
//! ```text
//! P1 = 128*a + floor(128*b/c) - 512
//! P2 = 128*b - c*floor(128*b/c)
//! P3 = c
//! ```

use embedded_hal::i2c::I2c;

use crate::config::{SI5351_DENOMINATOR, SI5351_PLL_RATIO, SI5351_XTAL_HZ};
use crate::error::{Error, Result};
use crate::hal::i2c::{I2cAddress, I2cBus};
use crate::types::Frequency;

/// `Si5351A` register addresses
mod reg {
    pub const DEVICE_STATUS: u8 = 0;
    pub const OUTPUT_ENABLE: u8 = 3;
    pub const PLL_SOURCE: u8 = 15;
    pub const CLK0_CONTROL: u8 = 16;
    pub const CLK1_CONTROL: u8 = 17;
    pub const CLK2_CONTROL: u8 = 18;
    pub const PLLA_PARAMS: u8 = 26;
    pub const PLLB_PARAMS: u8 = 34;
    pub const MS0_PARAMS: u8 = 42;
    pub const MS1_PARAMS: u8 = 50;
    pub const MS2_PARAMS: u8 = 58;
    pub const SPREAD_SPECTRUM: u8 = 149;
    pub const PLL_RESET: u8 = 177;
    pub const CRYSTAL_LOAD: u8 = 183;
}

/// Crystal load of 10 pF with the reserved low bits at their reset value
const CRYSTAL_LOAD_10PF: u8 = 0xD2;

/// Output powered, integer mode off, sourced from PLL A, 8 mA drive
const CLK_CONTROL_PLLA_8MA: u8 = 0x0E;

/// Reset PLL A
const PLLA_RESET: u8 = 1 << 5;

/// Device status: system initialisation in progress
const STATUS_SYS_INIT: u8 = 1 << 7;

/// Multisynth divider limits for fractional operation
const MIN_DIVIDER: u32 = 4;
const MAX_DIVIDER: u32 = 2048;

/// Fractional divider block addressed by a base register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthChannel {
    /// PLL A feedback multisynth
    PllA,
    /// PLL B feedback multisynth
    PllB,
    /// Output multisynth 0 (CLK0)
    Ms0,
    /// Output multisynth 1 (CLK1)
    Ms1,
    /// Output multisynth 2 (CLK2)
    Ms2,
}

impl SynthChannel {
    /// First of the eight parameter registers
    #[must_use]
    pub const fn base_reg(self) -> u8 {
        match self {
            Self::PllA => reg::PLLA_PARAMS,
            Self::PllB => reg::PLLB_PARAMS,
            Self::Ms0 => reg::MS0_PARAMS,
            Self::Ms1 => reg::MS1_PARAMS,
            Self::Ms2 => reg::MS2_PARAMS,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SynthChannel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::PllA => defmt::write!(f, "PLLA"),
            Self::PllB => defmt::write!(f, "PLLB"),
            Self::Ms0 => defmt::write!(f, "MS0"),
            Self::Ms1 => defmt::write!(f, "MS1"),
            Self::Ms2 => defmt::write!(f, "MS2"),
        }
    }
}

/// Fractional divider `a + b/c`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DividerParams {
    /// Integer part
    pub a: u32,
    /// Numerator (0 to c-1)
    pub b: u32,
    /// Denominator (1-1048575)
    pub c: u32,
}

impl DividerParams {
    /// Integer divider with the fixed denominator (`b = 0`)
    #[must_use]
    pub const fn integer(a: u32) -> Self {
        Self {
            a,
            b: 0,
            c: SI5351_DENOMINATOR,
        }
    }

    /// Divider that brings the VCO down to `target`
    ///
    /// Computes `fdiv = f_xtal * R / f_target` exactly in integers: `a` is
    /// the quotient and `b` the remainder scaled to `c` and rounded.
    pub fn for_output(target: Frequency) -> Result<Self> {
        let hz = u64::from(target.as_hz());
        if hz == 0 {
            return Err(Error::Unsynthesizable(0));
        }

        let vco = u64::from(SI5351_XTAL_HZ) * u64::from(SI5351_PLL_RATIO);
        let c = u64::from(SI5351_DENOMINATOR);
        let mut a = vco / hz;
        let mut b = ((vco % hz) * c + hz / 2) / hz;
        if b >= c {
            a += 1;
            b = 0;
        }

        if a < u64::from(MIN_DIVIDER) || a > u64::from(MAX_DIVIDER) {
            return Err(Error::Unsynthesizable(target.as_hz()));
        }

        Ok(Self {
            a: a as u32,
            b: b as u32,
            c: SI5351_DENOMINATOR,
        })
    }

    /// Output frequency produced from the VCO, in Hz (rounded)
    #[must_use]
    pub fn output_hz(&self) -> u32 {
        let vco = u64::from(SI5351_XTAL_HZ) * u64::from(SI5351_PLL_RATIO);
        let den = u64::from(self.a) * u64::from(self.c) + u64::from(self.b);
        ((vco * u64::from(self.c) + den / 2) / den) as u32
    }

    /// Calculate P1, P2, P3 register values
    #[must_use]
    pub const fn to_registers(&self) -> (u32, u32, u32) {
        let floor_128b_c = (128 * self.b) / self.c;
        let p1 = 128 * self.a + floor_128b_c - 512;
        let p2 = 128 * self.b - self.c * floor_128b_c;
        let p3 = self.c;
        (p1, p2, p3)
    }

    /// The eight parameter register bytes, in register order
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 8] {
        let (p1, p2, p3) = self.to_registers();
        [
            ((p3 >> 8) & 0xFF) as u8,
            (p3 & 0xFF) as u8,
            ((p1 >> 16) & 0x03) as u8,
            ((p1 >> 8) & 0xFF) as u8,
            (p1 & 0xFF) as u8,
            (((p3 >> 12) & 0xF0) | ((p2 >> 16) & 0x0F)) as u8,
            ((p2 >> 8) & 0xFF) as u8,
            (p2 & 0xFF) as u8,
        ]
    }
}

/// Synthesizer producing the local oscillator
pub trait LocalOscillator {
    /// Program `channel` to output `freq`
    fn set_freq(&mut self, channel: SynthChannel, freq: Frequency) -> Result<()>;
}

/// `Si5351A` driver
#[derive(Debug)]
pub struct Si5351<I2C> {
    bus: I2cBus<I2C>,
}

impl<I2C: I2c> Si5351<I2C> {
    /// Create a new driver at the default address
    #[must_use]
    pub const fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, I2cAddress::SI5351)
    }

    /// Create a new driver at a strapped address
    #[must_use]
    pub const fn with_address(i2c: I2C, addr: I2cAddress) -> Self {
        Self {
            bus: I2cBus::new(i2c, addr),
        }
    }

    /// One-time bring-up
    ///
    /// Crystal as PLL reference, spread spectrum off, 10 pF load, all
    /// outputs enabled and fed from PLL A, PLL A reset, then the VCO set
    /// to `SI5351_PLL_RATIO` times the crystal with no fractional part.
    pub fn start(&mut self) -> Result<()> {
        self.bus.write_reg(reg::PLL_SOURCE, 0)?;
        self.bus.write_reg(reg::SPREAD_SPECTRUM, 0)?;
        self.bus.write_reg(reg::CRYSTAL_LOAD, CRYSTAL_LOAD_10PF)?;
        self.bus.write_reg(reg::OUTPUT_ENABLE, 0x00)?;
        for control in [reg::CLK0_CONTROL, reg::CLK1_CONTROL, reg::CLK2_CONTROL] {
            self.bus.write_reg(control, CLK_CONTROL_PLLA_8MA)?;
        }
        self.bus.write_reg(reg::PLL_RESET, PLLA_RESET)?;

        let vco = DividerParams::integer(SI5351_PLL_RATIO);
        self.write_params(SynthChannel::PllA, &vco)?;

        #[cfg(feature = "embedded")]
        defmt::info!("Si5351 started, VCO {} MHz", SI5351_XTAL_HZ / 1_000_000 * SI5351_PLL_RATIO);

        Ok(())
    }

    /// Whether the device has finished its power-on initialisation
    pub fn is_ready(&mut self) -> Result<bool> {
        let status = self.bus.read_reg(reg::DEVICE_STATUS)?;
        Ok(status & STATUS_SYS_INIT == 0)
    }

    /// Write a divider into a channel's eight parameter registers
    pub fn write_params(&mut self, channel: SynthChannel, params: &DividerParams) -> Result<()> {
        self.bus.write_regs(channel.base_reg(), &params.to_bytes())
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.bus.release()
    }
}

impl<I2C: I2c> LocalOscillator for Si5351<I2C> {
    fn set_freq(&mut self, channel: SynthChannel, freq: Frequency) -> Result<()> {
        let params = DividerParams::for_output(freq)?;
        self.write_params(channel, &params)
    }
}
