//! # Pico Raspberry Library
//!
//! Turn buttons wired to a Raspberry Pi's GPIO header into keyboard presses
//! for PICO-8 (or any other keyboard-driven game or emulator).
//!
//! This library provides the button-to-key translation engine: config
//! resolution, per-button edge handling and the controller owning all
//! bindings.

pub mod binding;
pub mod config;
pub mod controller;
pub mod error;
pub mod gpio;
pub mod keys;
pub mod runloop;
