//! # Table-Driven 6502 Emulator
//!
//! An NMOS 6502 emulator built around an opcode registry: each opcode byte
//! maps to an [`InstructionDescriptor`] carrying its mnemonic, length, base
//! cycle cost, addressing mode and handler. The [`CPU`] dispatcher fetches an
//! opcode, resolves it through the registry, hands the operand bytes to the
//! handler and advances the program counter.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use emu6502::{opcodes, FlatMemory, MemoryBus, CPU};
//!
//! let registry = Arc::new(opcodes::nmos6502().unwrap());
//!
//! let mut memory = FlatMemory::new();
//! memory.load(0x1000, &[0xA9, 0x42]); // LDAI $42
//!
//! let mut cpu = CPU::new(memory, registry);
//! cpu.set_pc(0x1000);
//! cpu.step().unwrap();
//!
//! assert_eq!(cpu.a(), 0x42);
//! assert_eq!(cpu.pc(), 0x1002);
//! ```
//!
//! ## Modules
//!
//! - `registry` - Opcode registry, descriptors and the registration builder
//! - `opcodes` - The documented NMOS instruction set
//! - `cpu` - Dispatcher and CPU state
//! - `memory` - MemoryBus trait, flat RAM and object images
//! - `addressing` - Addressing mode enumeration
//! - `assembler` / `disassembler` - Line assembler and listings
//! - `emulator` / `debugger` - Shell for running and inspecting programs

pub mod addressing;
pub mod assembler;
pub mod clock;
pub mod config;
pub mod cpu;
pub mod debugger;
pub mod disassembler;
pub mod dump;
pub mod emulator;
pub mod memory;
pub mod opcodes;
pub mod registers;
pub mod registry;
pub mod trace;

// Handler implementations; only the execution context is public.
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

use thiserror::Error;

pub use addressing::AddressingMode;
pub use assembler::{assemble, AssemblerError, AssemblerErrorKind, Program};
pub use config::EmulatorConfig;
pub use cpu::{Executed, Phase, CPU};
pub use disassembler::{decode_at, list, Decoded};
pub use emulator::{Emulator, EmulatorError};
pub use instructions::{Context, Flow};
pub use memory::{FlatMemory, ImageError, MemoryBus};
pub use registers::Registers;
pub use registry::{Handler, InstructionDescriptor, OpcodeRegistry, RegistryBuilder, RegistryError};

/// Errors that stop the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The fetched opcode has no descriptor in the registry.
    #[error("illegal instruction 0x{opcode:02X} at 0x{address:04X}")]
    IllegalInstruction { opcode: u8, address: u16 },

    /// An earlier step unwound out of a handler; CPU state is unreliable
    /// until it is reset.
    #[error("cpu poisoned by an interrupted instruction at 0x{address:04X}")]
    Poisoned { address: u16 },
}
