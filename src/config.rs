//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the transceiver hardware.
//! All clock frequencies, bus addresses, timing and thresholds are centralized here.

use crate::types::{Band, VfoId};

/// MCU system clock (STM32F411 from a 25 MHz HSE)
pub const SYSTEM_CLOCK_HZ: u32 = 100_000_000;

/// Intermediate frequency of the receiver
pub const INTERMEDIATE_FREQUENCY_HZ: u32 = 10_000_000;

/// AD9951 reference clock
pub const DDS_CLOCK_HZ: u64 = 400_000_000;

/// AD9951 instruction byte: write frequency tuning word register
pub const DDS_SET_FREQUENCY_OPCODE: u8 = 0x04;

/// AD9951 reset pulse hold time
pub const DDS_RESET_HOLD_MS: u32 = 100;

/// `Si5351A` crystal frequency
pub const SI5351_XTAL_HZ: u32 = 25_000_000;

/// `Si5351A` PLL multiplication ratio (VCO = 800 MHz)
pub const SI5351_PLL_RATIO: u32 = 32;

/// Fractional denominator used for every multisynth (20 bits, maximal resolution)
pub const SI5351_DENOMINATOR: u32 = 0xF_FFFF;

/// `Si5351A` I2C address (7-bit)
pub const SI5351_I2C_ADDR: u8 = 0x60;

/// 24C65 EEPROM I2C address (7-bit)
pub const EEPROM_I2C_ADDR: u8 = 0x50;

/// 24C65 capacity in bytes
pub const EEPROM_SIZE: u16 = 8192;

/// Write cycle settle time after each EEPROM transaction
pub const EEPROM_SETTLE_MS: u32 = 5;

/// I2C bus frequency for `Si5351A` and EEPROM
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// Allowed deviation of a stored LO value from the intermediate frequency
pub const LO_TOLERANCE_HZ: u32 = 3_000;

/// ADC full scale (12-bit)
pub const ADC_MAX: u16 = 4095;

/// Keypad readings above this value mean "no key pressed"
pub const KEYPAD_RELEASED_THRESHOLD: u16 = 4000;

/// Nominal ADC readings of the six keypad ladder taps
pub const KEYPAD_LEVELS: [u16; 6] = [370, 735, 1320, 2462, 1863, 3135];

/// Half-width of each keypad voltage window (exclusive)
pub const KEYPAD_TOLERANCE: u16 = 100;

/// Hold time at or above which a key press counts as long
pub const LONG_PRESS_TICKS: u32 = 2;

/// Period of the time-base tick
pub const TICK_PERIOD_MS: u64 = 350;

/// Ticks between voltage/temperature refreshes and message timeout
pub const STATUS_REFRESH_TICKS: u32 = 3;

/// Band selected when the stored band index is invalid
pub const DEFAULT_BAND: Band = Band::M40;

/// VFO selected when the stored VFO index is invalid
pub const DEFAULT_VFO: VfoId = VfoId::A;

/// Idle banner shown on the message line
pub const BANNER: &str = "DK7IH 8-Band-TRX";

/// Persistent store byte map
pub mod store {
    //! EEPROM layout, relative to the start of the device

    /// First VFO frequency field
    pub const VFO_BASE: u16 = 128;

    /// Bytes per frequency field
    pub const FIELD_SIZE: u16 = 4;

    /// Bytes per band (two VFO fields)
    pub const BAND_STRIDE: u16 = 8;

    /// Pseudo-band index whose two fields hold the LO calibration values
    pub const LO_BAND_SLOT: u8 = 8;

    /// Last band used
    pub const LAST_BAND: u16 = 256;

    /// Last VFO used
    pub const LAST_VFO: u16 = 257;
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the board wiring

    /// I2C1 SCL (Si5351, EEPROM)
    pub const I2C1_SCL: &str = "PB6";

    /// I2C1 SDA (Si5351, EEPROM)
    pub const I2C1_SDA: &str = "PB9";

    /// DDS I/O update strobe
    pub const DDS_IO_UD: &str = "PB12";

    /// DDS serial data
    pub const DDS_SDIO: &str = "PB13";

    /// DDS serial clock
    pub const DDS_SCLK: &str = "PB14";

    /// DDS reset
    pub const DDS_RESET: &str = "PB15";

    /// Encoder primary line (EXTI0, rising edge)
    pub const ENCODER_A: &str = "PB0";

    /// Encoder secondary line
    pub const ENCODER_B: &str = "PB1";

    /// TX/RX status input (active low)
    pub const TX_RX_SENSE: &str = "PB3";

    /// Band relay bit 0
    pub const BAND_RELAY0: &str = "PA10";

    /// Band relay bit 1
    pub const BAND_RELAY1: &str = "PA11";

    /// Band relay bit 2
    pub const BAND_RELAY2: &str = "PA12";

    /// Keypad resistor ladder (ADC1 channel 4)
    pub const KEYPAD_ADC: &str = "PA4";

    /// Supply voltage divider (ADC1 channel 5)
    pub const SUPPLY_ADC: &str = "PA5";

    /// S-meter / power meter (ADC1 channel 6)
    pub const METER_ADC: &str = "PA6";

    /// PA temperature sensor (ADC1 channel 7)
    pub const TEMPERATURE_ADC: &str = "PA7";
}
