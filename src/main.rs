//! 8-Band Transceiver Main Application
//!
//! Entry point for the STM32F411 "Black Pill" controller. The encoder
//! edge and tick tasks run on an interrupt-priority executor so they
//! preempt the blocking control loop in thread mode.

#![no_std]
#![no_main]

use core::cell::RefCell;

use cortex_m_rt::entry;
use defmt::{info, unwrap};
use embassy_executor::InterruptExecutor;
use embassy_stm32::adc::{Adc, SampleTime};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c as BoardI2c;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::peripherals::{ADC1, PA4, PA5, PA6, PA7};
use embassy_stm32::rcc::{
    AHBPrescaler, APBPrescaler, Hse, HseMode, Pll, PllMul, PllPDiv, PllPreDiv, PllQDiv, PllSource,
    Sysclk,
};
use embassy_stm32::time::Hertz;
use embassy_time::{Delay, Duration, Ticker};
use embedded_hal_bus::i2c::RefCellDevice;
use {defmt_rtt as _, panic_probe as _};

use trx8_firmware::hal::adc::{AdcChannel, AnalogInput};
use trx8_firmware::hal::gpio::{BandRelay, TxRxSense};
use trx8_firmware::hal::serial::BitBangSerial;
use trx8_firmware::power::{PaTemperature, SignalLevel, SupplyVoltage};
use trx8_firmware::prelude::*;

/// Encoder accumulator shared by the interrupt tasks and the control loop
static TUNING: TuningInput = TuningInput::new();

static EXECUTOR_INPUT: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn USART6() {
    EXECUTOR_INPUT.on_interrupt();
}

/// ADC1 with the four analog pins
struct BoardAdc<'d> {
    adc: Adc<'d, ADC1>,
    keys: PA4,
    supply: PA5,
    meter: PA6,
    temperature: PA7,
}

impl AnalogInput for BoardAdc<'_> {
    fn read_channel(&mut self, channel: AdcChannel) -> u16 {
        match channel {
            AdcChannel::Keypad => self.adc.blocking_read(&mut self.keys),
            AdcChannel::Supply => self.adc.blocking_read(&mut self.supply),
            AdcChannel::Meter => self.adc.blocking_read(&mut self.meter),
            AdcChannel::Temperature => self.adc.blocking_read(&mut self.temperature),
        }
    }
}

/// Display sink that reports over RTT until a panel driver is attached
struct RttDisplay;

impl Display for RttDisplay {
    fn show_frequency(&mut self, freq: Frequency, _size: u8) {
        info!("FREQ {}", freq);
    }

    fn show_band(&mut self, band: Band, inverted: bool) {
        info!("BAND {} inv={}", band, inverted);
    }

    fn show_sideband(&mut self, sideband: Sideband, inverted: bool) {
        info!("SB {} inv={}", sideband, inverted);
    }

    fn show_vfo(&mut self, vfo: VfoId, band: Band, inverted: bool) {
        info!("{} on {} inv={}", vfo, band, inverted);
    }

    fn show_voltage(&mut self, voltage: SupplyVoltage) {
        info!("VDD {}", voltage);
    }

    fn show_temperature(&mut self, temperature: PaTemperature) {
        info!("PA {}", temperature);
    }

    fn show_meter(&mut self, level: SignalLevel) {
        defmt::trace!("METER {}", level);
    }

    fn show_message(&mut self, text: &str, color: MessageColor) {
        info!("MSG [{}] {=str}", color, text);
    }

    fn show_tx_rx(&mut self, state: TxRxState) {
        info!("{}", state);
    }
}

fn board_config() -> embassy_stm32::Config {
    let mut config = embassy_stm32::Config::default();
    // 25 MHz HSE -> 100 MHz SYSCLK
    config.rcc.hse = Some(Hse {
        freq: Hertz(25_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV25,
        mul: PllMul::MUL200,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV4),
        divr: None,
    });
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV1;
    config.rcc.sys = Sysclk::PLL1_P;
    config
}

#[entry]
fn main() -> ! {
    info!("TRX8 firmware v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(board_config());
    info!("Clocks configured, SYSCLK {} Hz", SYSTEM_CLOCK_HZ);

    // Encoder and time base
    interrupt::USART6.set_priority(Priority::P6);
    let spawner = EXECUTOR_INPUT.start(interrupt::USART6);
    let encoder_a = ExtiInput::new(p.PB0, p.EXTI0, Pull::Up);
    let encoder_b = Input::new(p.PB1, Pull::Up);
    unwrap!(spawner.spawn(encoder_task(encoder_a, encoder_b)));
    unwrap!(spawner.spawn(tick_task()));

    // AD9951
    let serial = BitBangSerial::new(
        Output::new(p.PB14, Level::Low, Speed::VeryHigh),
        Output::new(p.PB13, Level::Low, Speed::VeryHigh),
    );
    let mut dds = Ad9951::new(
        serial,
        Output::new(p.PB12, Level::Low, Speed::VeryHigh),
        Output::new(p.PB15, Level::High, Speed::Low),
    );
    unwrap!(dds.reset(&mut Delay));

    // Si5351 and EEPROM share I2C1
    let i2c = RefCell::new(BoardI2c::new_blocking(
        p.I2C1,
        p.PB6,
        p.PB9,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    ));
    let mut pll = Si5351::new(RefCellDevice::new(&i2c));
    while !unwrap!(pll.is_ready()) {}
    unwrap!(pll.start());
    let eeprom = Eeprom::new(RefCellDevice::new(&i2c), Delay);
    info!("I2C1 at {} Hz: Si5351 started", I2C_FREQUENCY_HZ);

    let relay = BandRelay::new(
        Output::new(p.PA10, Level::Low, Speed::Low),
        Output::new(p.PA11, Level::Low, Speed::Low),
        Output::new(p.PA12, Level::Low, Speed::Low),
    );

    let mut adc = Adc::new(p.ADC1);
    adc.set_sample_time(SampleTime::CYCLES480);
    let adc = BoardAdc {
        adc,
        keys: p.PA4,
        supply: p.PA5,
        meter: p.PA6,
        temperature: p.PA7,
    };

    let txrx = TxRxSense::new(Input::new(p.PB3, Pull::None));

    let trx = Transceiver::new(dds, pll, eeprom, relay);
    let mut control = ControlLoop::new(trx, &TUNING, adc, txrx, RttDisplay);
    let report = unwrap!(control.boot());
    if !report.is_clean() {
        defmt::warn!("persisted state repaired: {}", report);
    }

    info!("Entering control loop");
    control.run()
}

/// Samples both encoder lines on every rising edge of the primary line
#[embassy_executor::task]
async fn encoder_task(mut primary: ExtiInput<'static>, secondary: Input<'static>) {
    loop {
        primary.wait_for_rising_edge().await;
        TUNING.on_edge(primary.is_high(), secondary.is_high());
    }
}

/// Tuning window and system time base
#[embassy_executor::task]
async fn tick_task() {
    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));
    loop {
        ticker.next().await;
        TUNING.on_tick();
    }
}
