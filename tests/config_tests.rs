//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --test config_tests

use trx8_firmware::config::store::*;
use trx8_firmware::config::*;
use trx8_firmware::types::{Band, VfoId};

// =============================================================================
// Clock Tests
// =============================================================================

#[test]
fn system_clock_valid() {
    // STM32F411 max clock is 100 MHz
    assert_eq!(SYSTEM_CLOCK_HZ, 100_000_000);
}

#[test]
fn dds_output_below_nyquist() {
    let top = u64::from(Band::M10.upper_hz() + INTERMEDIATE_FREQUENCY_HZ);
    assert!(top < DDS_CLOCK_HZ / 2);
}

#[test]
fn si5351_vco_in_range() {
    // VCO must be 600-900 MHz
    let vco = SI5351_XTAL_HZ * SI5351_PLL_RATIO;
    assert!((600_000_000..=900_000_000).contains(&vco));
}

#[test]
fn si5351_denominator_is_20_bit_max() {
    assert_eq!(SI5351_DENOMINATOR, (1 << 20) - 1);
}

// =============================================================================
// I2C Configuration Tests
// =============================================================================

#[test]
fn i2c_addresses_are_7_bit_forms() {
    assert_eq!(SI5351_I2C_ADDR, 0xC0 >> 1);
    assert_eq!(EEPROM_I2C_ADDR, 0xA0 >> 1);
    assert_ne!(SI5351_I2C_ADDR, EEPROM_I2C_ADDR);
}

#[test]
fn i2c_standard_mode() {
    assert_eq!(I2C_FREQUENCY_HZ, 100_000);
}

// =============================================================================
// Store Layout Tests
// =============================================================================

#[test]
fn store_fields_fit_below_index_bytes() {
    // Nine 8-byte slots (eight bands plus the LO pair)
    let end = VFO_BASE + u16::from(LO_BAND_SLOT + 1) * BAND_STRIDE;
    assert!(end <= LAST_BAND);
    assert_eq!(LAST_VFO, LAST_BAND + 1);
    assert!(LAST_VFO < EEPROM_SIZE);
}

#[test]
fn store_stride_holds_two_fields() {
    assert_eq!(BAND_STRIDE, 2 * FIELD_SIZE);
    assert_eq!(usize::from(LO_BAND_SLOT), Band::COUNT);
}

// =============================================================================
// Keypad Tests
// =============================================================================

#[test]
fn keypad_windows_do_not_overlap() {
    for (i, a) in KEYPAD_LEVELS.iter().enumerate() {
        for b in &KEYPAD_LEVELS[i + 1..] {
            assert!(a.abs_diff(*b) >= 2 * KEYPAD_TOLERANCE, "{a} vs {b}");
        }
    }
}

#[test]
fn keypad_levels_below_release_threshold() {
    for level in KEYPAD_LEVELS {
        assert!(level + KEYPAD_TOLERANCE <= KEYPAD_RELEASED_THRESHOLD);
    }
    assert!(KEYPAD_RELEASED_THRESHOLD < ADC_MAX);
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn boot_defaults() {
    assert_eq!(DEFAULT_BAND, Band::M40);
    assert_eq!(DEFAULT_BAND.index(), 2);
    assert_eq!(DEFAULT_VFO, VfoId::A);
}

#[test]
fn lo_tolerance_is_even() {
    // Default LO sits at half the tolerance
    assert_eq!(LO_TOLERANCE_HZ % 2, 0);
}

#[test]
fn timing_constants() {
    assert_eq!(TICK_PERIOD_MS, 350);
    assert_eq!(STATUS_REFRESH_TICKS, 3);
    assert_eq!(LONG_PRESS_TICKS, 2);
    assert_eq!(EEPROM_SETTLE_MS, 5);
    assert_eq!(DDS_RESET_HOLD_MS, 100);
}
