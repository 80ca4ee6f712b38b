//! Hardware Abstraction Layer
//!
//! Thin seams over `embedded-hal` 1.0 traits. Drivers above this layer
//! never touch a concrete MCU peripheral, so the whole core builds and
//! tests on the host against simulated pins and buses.

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod serial;
