//! Build script for the transceiver firmware
//!
//! The linker script comes from `embassy-stm32`'s `memory-x` feature;
//! only `link.x` and the defmt table need to be requested here, and only
//! for the embedded binary.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
