//! WebAssembly bindings for the emu6502 emulator.
//!
//! Enabled with the `wasm` feature.

pub mod api;

pub use api::Emulator6502;
