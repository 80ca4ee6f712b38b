//! Control Loop Tests
//!
//! Boot screen, key dispatch, timed message clearing and the TX/RX
//! indicator, driven through scripted inputs and a recording display.
//! Run with: cargo test --test control_tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use trx8_firmware::config::BANNER;
use trx8_firmware::drivers::dds::OperatingSynth;
use trx8_firmware::drivers::eeprom::ByteStore;
use trx8_firmware::drivers::encoder::{TimeBase, TuningInput};
use trx8_firmware::drivers::keypad::KeyCode;
use trx8_firmware::drivers::si5351::{LocalOscillator, SynthChannel};
use trx8_firmware::error::{Error, Result};
use trx8_firmware::hal::adc::{AdcChannel, AdcReading, AnalogInput};
use trx8_firmware::hal::gpio::{BandSwitch, TxRxSense};
use trx8_firmware::power::{PaTemperature, SignalLevel, SupplyVoltage};
use trx8_firmware::radio::memory::FrequencyStore;
use trx8_firmware::radio::transceiver::Transceiver;
use trx8_firmware::types::{Band, Frequency, Sideband, TxRxState, VfoId};
use trx8_firmware::ui::{Command, ControlLoop, Display, MessageColor, FREQUENCY_SIZE};

// ============================================================================
// Fakes
// ============================================================================

struct NullDds;

impl OperatingSynth for NullDds {
    fn set_frequency(&mut self, _freq: Frequency) -> Result<()> {
        Ok(())
    }
}

/// Records every LO write; a write of the rejected frequency fails
struct Lo(Rc<RefCell<Vec<u32>>>, Rc<Cell<Option<u32>>>);

impl LocalOscillator for Lo {
    fn set_freq(&mut self, channel: SynthChannel, freq: Frequency) -> Result<()> {
        assert_eq!(channel, SynthChannel::Ms0);
        self.0.borrow_mut().push(freq.as_hz());
        if self.1.get() == Some(freq.as_hz()) {
            return Err(Error::Bus);
        }
        Ok(())
    }
}

struct NullRelay;

impl BandSwitch for NullRelay {
    fn select(&mut self, _band: Band) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct Ram(Rc<RefCell<Vec<u8>>>);

impl ByteStore for Ram {
    fn read(&mut self, addr: u16) -> Result<u8> {
        Ok(self.0.borrow()[usize::from(addr)])
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        self.0.borrow_mut()[usize::from(addr)] = value;
        Ok(())
    }
}

/// One keypad conversion and what happens right after it
#[derive(Clone, Copy)]
struct KeySample {
    level: u16,
    ticks: u32,
    edges: u32,
}

const fn key(level: u16, ticks: u32) -> KeySample {
    KeySample { level, ticks, edges: 0 }
}

const RELEASED: KeySample = key(4095, 0);

/// Short press: first sample, two averaged samples, release
fn short_press(level: u16) -> [KeySample; 4] {
    [key(level, 0), key(level, 0), key(level, 0), RELEASED]
}

/// Long press: the hold spans two ticks
fn long_press(level: u16) -> [KeySample; 4] {
    [key(level, 0), key(level, 1), key(level, 1), RELEASED]
}

struct Board<'a> {
    tuning: &'a TuningInput,
    keys: VecDeque<KeySample>,
    supply: u16,
    temperature: u16,
    meter: u16,
}

impl<'a> Board<'a> {
    fn new(tuning: &'a TuningInput) -> Self {
        Self {
            tuning,
            keys: VecDeque::new(),
            supply: 1560,
            temperature: 2000,
            meter: 800,
        }
    }
}

impl AnalogInput for Board<'_> {
    fn read_channel(&mut self, channel: AdcChannel) -> u16 {
        match channel {
            AdcChannel::Keypad => {
                let sample = self.keys.pop_front().unwrap_or(RELEASED);
                for _ in 0..sample.ticks {
                    self.tuning.on_tick();
                }
                for _ in 0..sample.edges {
                    self.tuning.on_edge(true, true);
                }
                sample.level
            }
            AdcChannel::Supply => self.supply,
            AdcChannel::Temperature => self.temperature,
            AdcChannel::Meter => self.meter,
        }
    }
}

/// Active-low TX line
struct Ptt(Rc<Cell<bool>>);

impl embedded_hal::digital::ErrorType for Ptt {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for Ptt {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(!self.0.get())
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.get())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Shown {
    Frequency(u32, u8),
    Band(Band, bool),
    Sideband(Sideband, bool),
    Vfo(VfoId, Band, bool),
    Voltage(SupplyVoltage),
    Temperature(PaTemperature),
    Meter(SignalLevel),
    Message(String, MessageColor),
    TxRx(TxRxState),
}

#[derive(Default)]
struct Screen {
    shown: Vec<Shown>,
}

impl Screen {
    fn messages(&self) -> Vec<(&str, MessageColor)> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Message(text, color) => Some((text.as_str(), *color)),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Shown) -> bool) -> usize {
        self.shown.iter().filter(|s| pred(s)).count()
    }
}

impl Display for Screen {
    fn show_frequency(&mut self, freq: Frequency, size: u8) {
        self.shown.push(Shown::Frequency(freq.as_hz(), size));
    }

    fn show_band(&mut self, band: Band, inverted: bool) {
        self.shown.push(Shown::Band(band, inverted));
    }

    fn show_sideband(&mut self, sideband: Sideband, inverted: bool) {
        self.shown.push(Shown::Sideband(sideband, inverted));
    }

    fn show_vfo(&mut self, vfo: VfoId, band: Band, inverted: bool) {
        self.shown.push(Shown::Vfo(vfo, band, inverted));
    }

    fn show_voltage(&mut self, voltage: SupplyVoltage) {
        self.shown.push(Shown::Voltage(voltage));
    }

    fn show_temperature(&mut self, temperature: PaTemperature) {
        self.shown.push(Shown::Temperature(temperature));
    }

    fn show_meter(&mut self, level: SignalLevel) {
        self.shown.push(Shown::Meter(level));
    }

    fn show_message(&mut self, text: &str, color: MessageColor) {
        self.shown.push(Shown::Message(text.to_owned(), color));
    }

    fn show_tx_rx(&mut self, state: TxRxState) {
        self.shown.push(Shown::TxRx(state));
    }
}

type TestLoop<'a> = ControlLoop<'a, NullDds, Lo, Ram, NullRelay, Board<'a>, Ptt, Screen>;

struct Rig<'a> {
    control: TestLoop<'a>,
    ram: Ram,
    lo: Rc<RefCell<Vec<u32>>>,
    lo_reject: Rc<Cell<Option<u32>>>,
    ptt: Rc<Cell<bool>>,
}

fn rig<'a>(tuning: &'a TuningInput, keys: &[KeySample]) -> Rig<'a> {
    let ram = Ram(Rc::new(RefCell::new(vec![0xFF; 512])));
    let lo = Rc::new(RefCell::new(Vec::new()));
    let lo_reject = Rc::new(Cell::new(None));
    let ptt = Rc::new(Cell::new(false));

    let trx = Transceiver::new(NullDds, Lo(Rc::clone(&lo), Rc::clone(&lo_reject)), ram.clone(), NullRelay);
    let mut board = Board::new(tuning);
    board.keys.extend(keys.iter().copied());

    let control = ControlLoop::new(
        trx,
        tuning,
        board,
        TxRxSense::new(Ptt(Rc::clone(&ptt))),
        Screen::default(),
    );
    Rig { control, ram, lo, lo_reject, ptt }
}

// ============================================================================
// Key mapping
// ============================================================================

#[test]
fn key_codes_map_to_commands() {
    assert_eq!(Command::from_key(KeyCode::short(0)), Some(Command::BandUp));
    assert_eq!(Command::from_key(KeyCode::short(1)), Some(Command::ToggleSideband));
    assert_eq!(Command::from_key(KeyCode::short(2)), Some(Command::SwapVfo));
    assert_eq!(Command::from_key(KeyCode::short(3)), Some(Command::BandDown));
    assert_eq!(Command::from_key(KeyCode::short(4)), Some(Command::SaveAll));
    assert_eq!(Command::from_key(KeyCode::short(5)), None);
    assert_eq!(
        Command::from_key(KeyCode::long(0)),
        Some(Command::CalibrateLo(Sideband::Lsb))
    );
    assert_eq!(
        Command::from_key(KeyCode::long(1)),
        Some(Command::CalibrateLo(Sideband::Usb))
    );
    for key in 2..6 {
        assert_eq!(Command::from_key(KeyCode::long(key)), None);
    }
}

// ============================================================================
// Boot
// ============================================================================

#[test]
fn boot_draws_full_screen_then_banner() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &[]);
    let report = rig.control.boot().unwrap();
    assert!(!report.is_clean());

    let supply = SupplyVoltage::from_reading(AdcReading::from_raw(1560));
    let temperature = PaTemperature::from_reading(AdcReading::from_raw(2000));
    assert_eq!(
        rig.control.display().shown,
        [
            Shown::Band(Band::M40, false),
            Shown::Vfo(VfoId::A, Band::M40, false),
            Shown::Frequency(7_120_000, FREQUENCY_SIZE),
            Shown::Sideband(Sideband::Lsb, false),
            Shown::Voltage(supply),
            Shown::Temperature(temperature),
            Shown::Message(BANNER.to_owned(), MessageColor::Info),
        ]
    );

    // Both LOs at boot, then the preferred one on activation
    assert_eq!(*rig.lo.borrow(), [9_998_500, 10_001_500, 9_998_500]);
}

// ============================================================================
// Step
// ============================================================================

#[test]
fn encoder_rotation_retunes_and_redraws() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &[]);
    rig.control.boot().unwrap();

    for _ in 0..5 {
        tuning.on_edge(true, true);
    }
    rig.control.step().unwrap();

    let screen = rig.control.display();
    assert!(screen.shown.contains(&Shown::Frequency(7_120_025, FREQUENCY_SIZE)));
    assert_eq!(rig.control.transceiver().state().operating_frequency().as_hz(), 7_120_025);
    assert!(screen
        .shown
        .contains(&Shown::Meter(SignalLevel::from_reading(AdcReading::from_raw(800)))));
}

#[test]
fn fast_rotation_accelerates_until_next_tick() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &[]);
    rig.control.boot().unwrap();

    for expected in [7_120_001, 7_120_005, 7_120_014] {
        tuning.on_edge(true, true);
        rig.control.step().unwrap();
        assert_eq!(rig.control.transceiver().state().operating_frequency().as_hz(), expected);
    }

    tuning.on_tick();
    tuning.on_edge(true, false);
    rig.control.step().unwrap();
    assert_eq!(rig.control.transceiver().state().operating_frequency().as_hz(), 7_120_013);
}

#[test]
fn idle_step_only_draws_meter_and_first_tx_rx() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &[]);
    rig.control.boot().unwrap();
    let before = rig.control.display().shown.len();

    rig.control.step().unwrap();
    let shown = &rig.control.display().shown[before..];
    assert_eq!(shown.len(), 2);
    assert!(matches!(shown[0], Shown::Meter(_)));
    assert_eq!(shown[1], Shown::TxRx(TxRxState::Rx));
}

#[test]
fn band_up_key_switches_band() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &short_press(370));
    rig.control.boot().unwrap();
    rig.control.step().unwrap();

    let state = rig.control.transceiver().state();
    assert_eq!(state.band(), Band::M20);
    assert_eq!(state.sideband(), Sideband::Usb);

    let screen = rig.control.display();
    assert!(screen.shown.contains(&Shown::Frequency(14_200_000, FREQUENCY_SIZE)));
    assert!(screen.shown.contains(&Shown::Band(Band::M20, false)));
    assert!(screen.shown.contains(&Shown::Sideband(Sideband::Usb, false)));
    assert_eq!(rig.ram.0.borrow()[256], 3);
}

#[test]
fn swap_and_sideband_keys() {
    let tuning = TuningInput::new();
    let mut keys = Vec::new();
    keys.extend(short_press(1320));
    keys.extend(short_press(735));
    let mut rig = rig(&tuning, &keys);
    rig.control.boot().unwrap();

    rig.control.step().unwrap();
    assert_eq!(rig.control.transceiver().state().vfo(), VfoId::B);
    assert!(rig
        .control
        .display()
        .shown
        .contains(&Shown::Vfo(VfoId::B, Band::M40, false)));

    rig.control.step().unwrap();
    assert_eq!(rig.control.transceiver().state().sideband(), Sideband::Usb);
    assert!(rig
        .control
        .display()
        .shown
        .contains(&Shown::Sideband(Sideband::Usb, false)));
}

#[test]
fn save_message_clears_after_timeout() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &short_press(1863));
    rig.control.boot().unwrap();
    tuning.on_edge(true, true);
    rig.control.step().unwrap();

    assert_eq!(
        rig.control.display().messages(),
        [(BANNER, MessageColor::Info), ("Saved.", MessageColor::Success)]
    );
    let mut store = FrequencyStore::new(rig.ram.clone());
    assert_eq!(store.load_frequency(Band::M40, VfoId::A).unwrap().as_hz(), 7_120_001);

    for _ in 0..3 {
        tuning.on_tick();
    }
    rig.control.step().unwrap();
    assert_eq!(rig.control.display().messages().len(), 2);

    tuning.on_tick();
    rig.control.step().unwrap();
    assert_eq!(
        rig.control.display().messages().last(),
        Some(&(BANNER, MessageColor::Info))
    );
    assert_eq!(rig.control.display().messages().len(), 3);
}

#[test]
fn status_refreshes_after_timeout() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &[]);
    rig.control.boot().unwrap();
    let is_voltage = |s: &Shown| matches!(s, Shown::Voltage(_));
    assert_eq!(rig.control.display().count(is_voltage), 1);

    for _ in 0..3 {
        tuning.on_tick();
    }
    rig.control.step().unwrap();
    assert_eq!(rig.control.display().count(is_voltage), 1);

    tuning.on_tick();
    rig.control.step().unwrap();
    assert_eq!(rig.control.display().count(is_voltage), 2);
}

#[test]
fn tx_rx_indicator_redraws_on_change_only() {
    let tuning = TuningInput::new();
    let mut rig = rig(&tuning, &[]);
    rig.control.boot().unwrap();
    let is_txrx = |s: &Shown| matches!(s, Shown::TxRx(_));

    rig.control.step().unwrap();
    rig.control.step().unwrap();
    assert_eq!(rig.control.display().count(is_txrx), 1);

    rig.ptt.set(true);
    rig.control.step().unwrap();
    rig.control.step().unwrap();
    assert_eq!(rig.control.display().count(is_txrx), 2);
    assert!(rig.control.display().shown.contains(&Shown::TxRx(TxRxState::Tx)));
}

#[test]
fn long_press_calibrates_and_stores_lo() {
    let tuning = TuningInput::new();
    let mut keys = Vec::new();
    keys.extend(long_press(370));
    // Three clockwise pulses arrive while the key is released
    keys.push(KeySample { level: 4095, ticks: 0, edges: 3 });
    keys.extend(long_press(735));
    let mut rig = rig(&tuning, &keys);
    rig.control.boot().unwrap();
    rig.control.step().unwrap();

    let state = rig.control.transceiver().state();
    assert_eq!(state.lo(Sideband::Lsb).as_hz(), 9_998_509);
    assert_eq!(state.sideband(), Sideband::Lsb);

    let mut store = FrequencyStore::new(rig.ram.clone());
    assert_eq!(store.load_lo(Sideband::Lsb).unwrap().as_hz(), 9_998_509);
    assert_eq!(rig.lo.borrow().last(), Some(&9_998_509));

    let shown = &rig.control.display().shown;
    let start = shown
        .iter()
        .position(|s| *s == Shown::Sideband(Sideband::Lsb, true))
        .unwrap();
    assert_eq!(
        shown[start..start + 6],
        [
            Shown::Sideband(Sideband::Lsb, true),
            Shown::Frequency(9_998_500, FREQUENCY_SIZE),
            Shown::Frequency(9_998_509, FREQUENCY_SIZE),
            Shown::Message("Stored.".to_owned(), MessageColor::Success),
            Shown::Frequency(7_120_000, FREQUENCY_SIZE),
            Shown::Sideband(Sideband::Lsb, false),
        ]
    );
}

#[test]
fn calibration_bus_error_still_restores_screen() {
    let tuning = TuningInput::new();
    let mut keys = Vec::new();
    keys.extend(long_press(370));
    keys.push(KeySample { level: 4095, ticks: 0, edges: 3 });
    let mut rig = rig(&tuning, &keys);
    rig.control.boot().unwrap();
    rig.lo_reject.set(Some(9_998_509));

    assert_eq!(rig.control.step(), Err(Error::Bus));

    assert_eq!(rig.lo.borrow().last(), Some(&9_998_500));
    assert_eq!(rig.control.transceiver().state().lo(Sideband::Lsb).as_hz(), 9_998_500);
    let shown = &rig.control.display().shown;
    assert_eq!(
        shown[shown.len() - 2..],
        [
            Shown::Frequency(7_120_000, FREQUENCY_SIZE),
            Shown::Sideband(Sideband::Lsb, false),
        ]
    );
}

#[test]
fn calibration_abort_keeps_previous_lo() {
    let tuning = TuningInput::new();
    let mut keys = Vec::new();
    keys.extend(long_press(735));
    keys.push(KeySample { level: 4095, ticks: 0, edges: 2 });
    keys.extend(long_press(370));
    let mut rig = rig(&tuning, &keys);
    rig.control.boot().unwrap();
    rig.control.step().unwrap();

    assert_eq!(rig.control.transceiver().state().lo(Sideband::Usb).as_hz(), 10_001_500);
    assert_eq!(rig.lo.borrow().last(), Some(&10_001_500));
    assert_eq!(
        rig.control.display().messages().last(),
        Some(&("Aborted.", MessageColor::Warning))
    );
    assert!(tuning.ticks() >= 4);
}
