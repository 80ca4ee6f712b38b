//! 8-Band Transceiver Control Firmware Library
//!
//! This library provides the control core of an STM32F411-based
//! shortwave transceiver covering eight amateur bands. The operating
//! frequency comes from an AD9951 direct digital synthesizer, the
//! local oscillator from an `Si5351A` fractional-N PLL.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │         Control Loop  │  Display sink (external)             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RADIO LAYER                             │
//! │  Transceiver ops  │  VFO bank  │  Persistent layout          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     DRIVER LAYER                             │
//! │  AD9951  │  Si5351  │  24C65  │  Encoder  │  Keypad          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / SEAM LAYER                           │
//! │  bit-banged serial │ I2C registers │ ADC │ GPIO              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Generic over `embedded-hal`**: every driver is testable on the host
//! - **Typed substitutions**: invalid persisted data is replaced, and the
//!   replacement is reported rather than hidden
//! - **One interrupt-shared cell**: only the tuning accumulator crosses
//!   the interrupt boundary, always inside a critical section
//! - **No unsafe in library code**

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Hardware seams
///
/// Bit-banged serial, register-addressed I2C, ADC and GPIO helpers
/// built on `embedded-hal` traits.
pub mod hal;

/// Peripheral Drivers
///
/// Drivers for the DDS, PLL, EEPROM, tuning encoder and keypad.
pub mod drivers;

/// Radio Control Logic
///
/// Band/VFO state, persistence layout and transceiver operations.
pub mod radio;

/// Analog readouts
///
/// Supply voltage, PA temperature and S-meter conversions.
pub mod power;

/// User Interface
///
/// Display collaborator interface and the control loop.
pub mod ui;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Crate error type
pub mod error;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::error::{Error, Result};
    pub use crate::types::*;

    pub use crate::drivers::dds::{Ad9951, OperatingSynth};
    pub use crate::drivers::eeprom::{ByteStore, Eeprom};
    pub use crate::drivers::encoder::{TimeBase, TuningEvent, TuningInput};
    pub use crate::drivers::keypad::{KeyCode, KeypadDecoder};
    pub use crate::drivers::si5351::{LocalOscillator, Si5351};
    pub use crate::radio::transceiver::{BootReport, CalibrationOutcome, Transceiver};
    pub use crate::ui::{ControlLoop, Display, MessageColor};

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::{InputPin, OutputPin};
    pub use embedded_hal::i2c::I2c;

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
