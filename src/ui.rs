//! User Interface
//!
//! The display is an external collaborator that receives semantic values
//! and does its own rendering. The control loop polls the operator
//! inputs and dispatches key codes to transceiver operations.

use embedded_hal::digital::InputPin;

use crate::config::{BANNER, STATUS_REFRESH_TICKS};
use crate::drivers::dds::OperatingSynth;
use crate::drivers::eeprom::ByteStore;
use crate::drivers::encoder::{TimeBase, TuningEvent, TuningInput};
use crate::drivers::keypad::{KeyCode, KeypadDecoder};
use crate::drivers::si5351::LocalOscillator;
use crate::error::Result;
use crate::hal::adc::{AdcChannel, AdcReading, AnalogInput};
use crate::hal::gpio::{BandSwitch, TxRxSense};
use crate::power::{PaTemperature, SignalLevel, SupplyVoltage};
use crate::radio::transceiver::{BootReport, CalibrationOutcome, OperatorInput, Transceiver};
use crate::types::{Band, Frequency, Sideband, TxRxState, VfoId};

/// Character size used for the main frequency readout
pub const FREQUENCY_SIZE: u8 = 2;

/// Transient message colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MessageColor {
    /// Neutral (idle banner)
    #[default]
    Info,
    /// Operation completed
    Success,
    /// Operation abandoned
    Warning,
}

#[cfg(feature = "embedded")]
impl defmt::Format for MessageColor {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Info => defmt::write!(f, "Info"),
            Self::Success => defmt::write!(f, "Success"),
            Self::Warning => defmt::write!(f, "Warning"),
        }
    }
}

/// Display sink
pub trait Display {
    /// Main frequency readout
    fn show_frequency(&mut self, freq: Frequency, size: u8);
    /// Band name
    fn show_band(&mut self, band: Band, inverted: bool);
    /// Sideband label
    fn show_sideband(&mut self, sideband: Sideband, inverted: bool);
    /// Active VFO
    fn show_vfo(&mut self, vfo: VfoId, band: Band, inverted: bool);
    /// Supply voltage
    fn show_voltage(&mut self, voltage: SupplyVoltage);
    /// PA temperature
    fn show_temperature(&mut self, temperature: PaTemperature);
    /// Meter bar
    fn show_meter(&mut self, level: SignalLevel);
    /// Transient message line
    fn show_message(&mut self, text: &str, color: MessageColor);
    /// TX/RX indicator
    fn show_tx_rx(&mut self, state: TxRxState);
}

/// Keypad command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Next band up
    BandUp,
    /// Flip the sideband flag
    ToggleSideband,
    /// Swap VFO A/B
    SwapVfo,
    /// Next band down
    BandDown,
    /// Persist all VFOs
    SaveAll,
    /// Enter LO calibration for a sideband
    CalibrateLo(Sideband),
}

impl Command {
    /// Map a key code; unassigned codes give `None`
    #[must_use]
    pub const fn from_key(code: KeyCode) -> Option<Self> {
        match code.raw() {
            0 => Some(Self::BandUp),
            1 => Some(Self::ToggleSideband),
            2 => Some(Self::SwapVfo),
            3 => Some(Self::BandDown),
            4 => Some(Self::SaveAll),
            6 => Some(Self::CalibrateLo(Sideband::Lsb)),
            7 => Some(Self::CalibrateLo(Sideband::Usb)),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::BandUp => defmt::write!(f, "BandUp"),
            Self::ToggleSideband => defmt::write!(f, "ToggleSideband"),
            Self::SwapVfo => defmt::write!(f, "SwapVfo"),
            Self::BandDown => defmt::write!(f, "BandDown"),
            Self::SaveAll => defmt::write!(f, "SaveAll"),
            Self::CalibrateLo(sb) => defmt::write!(f, "CalibrateLo({})", sb),
        }
    }
}

struct Operator<'a, A> {
    tuning: &'a TuningInput,
    keypad: &'a mut KeypadDecoder,
    adc: &'a mut A,
}

impl<A: AnalogInput> OperatorInput for Operator<'_, A> {
    fn tuning(&mut self) -> Option<TuningEvent> {
        self.tuning.take()
    }

    fn key(&mut self) -> Option<KeyCode> {
        self.keypad.poll(&mut *self.adc, self.tuning)
    }
}

/// Cooperative control loop
///
/// Owns the transceiver and the operator-facing peripherals; the tuning
/// accumulator is shared with the interrupt handlers.
pub struct ControlLoop<'t, D, L, S, R, A, P, V> {
    trx: Transceiver<D, L, S, R>,
    tuning: &'t TuningInput,
    keypad: KeypadDecoder,
    adc: A,
    txrx: TxRxSense<P>,
    display: V,
    last_txrx: Option<TxRxState>,
    message_at: Option<u32>,
    measured_at: u32,
}

impl<'t, D, L, S, R, A, P, V> ControlLoop<'t, D, L, S, R, A, P, V>
where
    D: OperatingSynth,
    L: LocalOscillator,
    S: ByteStore,
    R: BandSwitch,
    A: AnalogInput,
    P: InputPin,
    V: Display,
{
    /// Assemble the loop
    pub fn new(
        trx: Transceiver<D, L, S, R>,
        tuning: &'t TuningInput,
        adc: A,
        txrx: TxRxSense<P>,
        display: V,
    ) -> Self {
        Self {
            trx,
            tuning,
            keypad: KeypadDecoder::new(),
            adc,
            txrx,
            display,
            last_txrx: None,
            message_at: None,
            measured_at: 0,
        }
    }

    /// Transceiver
    pub const fn transceiver(&self) -> &Transceiver<D, L, S, R> {
        &self.trx
    }

    /// Display sink
    pub const fn display(&self) -> &V {
        &self.display
    }

    /// Load persisted state, bring the hardware up and draw the screen
    pub fn boot(&mut self) -> Result<BootReport> {
        let report = self.trx.boot_load()?;
        self.trx.activate()?;

        let state = self.trx.state();
        self.display.show_band(state.band(), false);
        self.display.show_vfo(state.vfo(), state.band(), false);
        self.display.show_frequency(state.operating_frequency(), FREQUENCY_SIZE);
        self.display.show_sideband(state.sideband(), false);
        self.refresh_status();
        self.display.show_message(BANNER, MessageColor::Info);

        Ok(report)
    }

    fn refresh_status(&mut self) {
        let supply = AdcReading::from_raw(self.adc.read_channel(AdcChannel::Supply));
        let temperature = AdcReading::from_raw(self.adc.read_channel(AdcChannel::Temperature));
        self.display.show_voltage(SupplyVoltage::from_reading(supply));
        self.display.show_temperature(PaTemperature::from_reading(temperature));
        self.measured_at = self.tuning.ticks();
    }

    fn message(&mut self, text: &str, color: MessageColor) {
        self.display.show_message(text, color);
        self.message_at = Some(self.tuning.ticks());
    }

    /// One pass: tuning, keypad, meter, timed refreshes, TX/RX indicator
    pub fn step(&mut self) -> Result<()> {
        if let Some(event) = self.tuning.take() {
            let freq = self.trx.apply_tuning(event.delta())?;
            self.display.show_frequency(freq, FREQUENCY_SIZE);
        }

        if let Some(code) = self.keypad.poll(&mut self.adc, self.tuning) {
            self.message_at = self.keypad.last_match();
            if let Some(command) = Command::from_key(code) {
                self.dispatch(command)?;
            }
        }

        let meter = AdcReading::from_raw(self.adc.read_channel(AdcChannel::Meter));
        self.display.show_meter(SignalLevel::from_reading(meter));

        let now = self.tuning.ticks();
        if let Some(at) = self.message_at {
            if now.wrapping_sub(at) > STATUS_REFRESH_TICKS {
                self.display.show_message(BANNER, MessageColor::Info);
                self.message_at = None;
            }
        }

        let txrx = self.txrx.state()?;
        if self.last_txrx != Some(txrx) {
            self.display.show_tx_rx(txrx);
            self.last_txrx = Some(txrx);
        }

        if now.wrapping_sub(self.measured_at) > STATUS_REFRESH_TICKS {
            self.refresh_status();
        }

        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        #[cfg(feature = "embedded")]
        defmt::debug!("command {}", command);

        match command {
            Command::BandUp | Command::BandDown => {
                let delta = if command == Command::BandUp { 1 } else { -1 };
                if self.trx.select_band(delta)? {
                    let state = self.trx.state();
                    self.display.show_frequency(state.operating_frequency(), FREQUENCY_SIZE);
                    self.display.show_band(state.band(), false);
                    self.display.show_sideband(state.sideband(), false);
                }
            }
            Command::ToggleSideband => {
                let sideband = self.trx.select_sideband();
                self.display.show_sideband(sideband, false);
            }
            Command::SwapVfo => {
                let vfo = self.trx.select_vfo()?;
                let state = self.trx.state();
                self.display.show_vfo(vfo, state.band(), false);
                self.display.show_frequency(state.operating_frequency(), FREQUENCY_SIZE);
            }
            Command::SaveAll => {
                self.trx.save_all()?;
                self.message("Saved.", MessageColor::Success);
            }
            Command::CalibrateLo(sideband) => self.calibrate(sideband)?,
        }
        Ok(())
    }

    fn calibrate(&mut self, sideband: Sideband) -> Result<()> {
        self.display.show_sideband(sideband, true);

        let mut operator = Operator {
            tuning: self.tuning,
            keypad: &mut self.keypad,
            adc: &mut self.adc,
        };
        let display = &mut self.display;
        let outcome = self.trx.calibrate_lo(sideband, &mut operator, |freq| {
            display.show_frequency(freq, FREQUENCY_SIZE);
        });

        match outcome {
            Ok(CalibrationOutcome::Stored(_)) => self.message("Stored.", MessageColor::Success),
            Ok(CalibrationOutcome::Aborted) => self.message("Aborted.", MessageColor::Warning),
            Err(_) => {}
        }

        let state = self.trx.state();
        self.display.show_frequency(state.operating_frequency(), FREQUENCY_SIZE);
        self.display.show_sideband(state.sideband(), false);
        outcome.map(|_| ())
    }

    /// Run until power-off; step errors are logged and the loop continues
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(_err) = self.step() {
                #[cfg(feature = "embedded")]
                defmt::warn!("control loop: {}", _err);
            }
        }
    }
}
