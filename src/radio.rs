//! Radio Control Logic
//!
//! Band/VFO state, its persistent layout and the operations that keep
//! the synthesizers, relays and store in step with it.

pub mod memory;
pub mod state;
pub mod transceiver;
pub mod vfo;
