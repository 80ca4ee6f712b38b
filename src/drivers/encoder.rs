//! Rotary Encoder Tuning Input
//!
//! The encoder's primary line raises an interrupt on its rising edge;
//! the handler samples both lines and, when the primary line is still
//! high, the secondary line gives the direction. A periodic tick clears
//! the pulse count, so the pulses seen between two ticks measure how
//! fast the knob turns. The tick count is also the firmware's only
//! time base.
//!
//! The control loop consumes only the pending direction; the pulse count
//! keeps growing until the next tick, so successive steps within one
//! tick grow as 1, 4, 9, ... Hz while the knob spins fast.
//!
//! Everything the interrupt handlers touch lives in one
//! [`critical_section::Mutex`], so an edge can never interleave with the
//! tick's clear or the control loop's take.

use core::cell::Cell;

use critical_section::Mutex;

/// Encoder rotation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise rotation (increment)
    Clockwise,
    /// Counter-clockwise rotation (decrement)
    CounterClockwise,
}

impl Direction {
    /// +1 for clockwise, -1 for counter-clockwise
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clockwise => defmt::write!(f, "CW"),
            Self::CounterClockwise => defmt::write!(f, "CCW"),
        }
    }
}

/// Pending rotation consumed by the control loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuningEvent {
    /// Direction of the most recent edge
    pub direction: Direction,
    /// Edges counted since the last tick
    pub pulses: u32,
}

impl TuningEvent {
    /// Frequency change in Hz: `direction * pulses²`
    #[must_use]
    pub fn delta(&self) -> i64 {
        let pulses = i64::from(self.pulses);
        self.direction.sign() * pulses * pulses
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuningEvent {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Tune({}, {})", self.direction, self.pulses);
    }
}

#[derive(Clone, Copy, Debug)]
struct Accumulator {
    direction: Option<Direction>,
    pulses: u32,
    ticks: u32,
}

impl Accumulator {
    const IDLE: Self = Self {
        direction: None,
        pulses: 0,
        ticks: 0,
    };
}

/// Source of the elapsed-tick count
pub trait TimeBase {
    /// Ticks since start-up (wrapping)
    fn ticks(&self) -> u32;
}

impl<T: TimeBase + ?Sized> TimeBase for &T {
    fn ticks(&self) -> u32 {
        (**self).ticks()
    }
}

/// Interrupt-shared tuning accumulator
///
/// Meant to live in a `static`; all methods take `&self`.
///
/// ```
/// use trx8_firmware::drivers::encoder::TuningInput;
///
/// static TUNING: TuningInput = TuningInput::new();
///
/// TUNING.on_edge(true, true);
/// TUNING.on_edge(true, true);
/// assert_eq!(TUNING.take().map(|e| e.delta()), Some(4));
/// ```
pub struct TuningInput {
    state: Mutex<Cell<Accumulator>>,
}

impl TuningInput {
    /// Create an idle accumulator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(Accumulator::IDLE)),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Accumulator)) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut acc = cell.get();
            f(&mut acc);
            cell.set(acc);
        });
    }

    /// Primary-line rising edge handler
    ///
    /// Edges where the primary line already reads low are bounce and
    /// are ignored.
    pub fn on_edge(&self, primary_high: bool, secondary_high: bool) {
        if !primary_high {
            return;
        }
        let direction = if secondary_high {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        self.update(|acc| {
            acc.direction = Some(direction);
            acc.pulses = acc.pulses.saturating_add(1);
        });
    }

    /// Periodic tick handler: restart the pulse window and advance time
    pub fn on_tick(&self) {
        self.update(|acc| {
            acc.pulses = 0;
            acc.ticks = acc.ticks.wrapping_add(1);
        });
    }

    /// Take the pending rotation in one critical section
    ///
    /// Clears the direction only; the pulse count stays until the next
    /// tick. Returns `None` when no edge arrived since the last call or
    /// the tick already cleared the pulses.
    pub fn take(&self) -> Option<TuningEvent> {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut acc = cell.get();
            let direction = acc.direction.take();
            let pulses = acc.pulses;
            cell.set(acc);
            match (direction, pulses) {
                (Some(direction), pulses) if pulses > 0 => Some(TuningEvent { direction, pulses }),
                _ => None,
            }
        })
    }

    /// Pulses counted in the current tick window
    #[must_use]
    pub fn pending_pulses(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).get().pulses)
    }
}

impl Default for TuningInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeBase for TuningInput {
    fn ticks(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).get().ticks)
    }
}
