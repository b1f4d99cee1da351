//! # Opcode Registry
//!
//! Maps each opcode byte to the descriptor of the instruction it encodes.
//! Registration happens once through a [`RegistryBuilder`]; the built
//! [`OpcodeRegistry`] has no mutation API and is shared read-only (usually
//! behind an `Arc`) by every CPU that dispatches through it.
//!
//! ```
//! use emu6502::opcodes;
//!
//! let registry = opcodes::nmos6502().unwrap();
//! let brk = registry.lookup(0x00).unwrap();
//! assert_eq!(brk.mnemonic, "BRK");
//! assert_eq!(brk.length, 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::addressing::AddressingMode;
use crate::instructions::{Context, Flow};

/// Executable behavior of one opcode.
///
/// Handlers see the CPU only through a [`Context`], so they cannot dispatch
/// another instruction while running.
pub type Handler = fn(&mut Context<'_>) -> Flow;

/// Static description of a single opcode.
#[derive(Clone, Copy)]
pub struct InstructionDescriptor {
    /// Opcode byte; unique within a registry.
    pub opcode: u8,

    /// Instruction name, unique within a registry (e.g. "LDAI", "BRK").
    pub mnemonic: &'static str,

    /// Full instruction length in bytes (opcode + operands, 1-3).
    pub length: u8,

    /// Base cycle cost before page-crossing and branch penalties.
    pub cycles: u8,

    /// How the operand bytes are interpreted.
    pub mode: AddressingMode,

    /// Human-readable summary.
    pub description: &'static str,

    /// Behavior invoked by the dispatcher.
    pub handler: Handler,
}

impl InstructionDescriptor {
    /// Number of operand bytes following the opcode.
    pub fn operand_len(&self) -> u8 {
        self.length.saturating_sub(1)
    }
}

impl fmt::Debug for InstructionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstructionDescriptor")
            .field("opcode", &format_args!("0x{:02X}", self.opcode))
            .field("mnemonic", &self.mnemonic)
            .field("length", &self.length)
            .field("cycles", &self.cycles)
            .field("mode", &self.mode)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Errors raised while building or querying a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The opcode already has a descriptor.
    #[error("opcode 0x{opcode:02X} already registered as {existing}, cannot register {mnemonic}")]
    DuplicateOpcode {
        opcode: u8,
        existing: &'static str,
        mnemonic: &'static str,
    },

    /// Another opcode already uses this mnemonic.
    #[error("mnemonic {mnemonic} already registered for opcode 0x{existing:02X}")]
    DuplicateMnemonic {
        mnemonic: &'static str,
        existing: u8,
    },

    /// Length is outside 1..=3.
    #[error("opcode 0x{opcode:02X} has invalid length {length}")]
    InvalidLength { opcode: u8, length: u8 },

    /// Length disagrees with the operand size of the addressing mode.
    #[error("opcode 0x{opcode:02X} has length {length} but {mode} addressing needs {expected}")]
    LengthMismatch {
        opcode: u8,
        length: u8,
        mode: AddressingMode,
        expected: u8,
    },

    /// No descriptor is registered for the opcode.
    #[error("opcode 0x{0:02X} is not registered")]
    UnknownOpcode(u8),
}

/// Collects descriptors during the initialization phase.
pub struct RegistryBuilder {
    slots: [Option<InstructionDescriptor>; 256],
    mnemonics: HashMap<String, u8>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            slots: [None; 256],
            mnemonics: HashMap::new(),
        }
    }

    /// Registers one descriptor.
    ///
    /// Fails without changing the builder if the opcode or mnemonic is
    /// already taken, or if the length is not consistent with the mode.
    pub fn register(
        &mut self,
        descriptor: InstructionDescriptor,
    ) -> Result<&mut Self, RegistryError> {
        let opcode = descriptor.opcode;

        if let Some(existing) = &self.slots[opcode as usize] {
            return Err(RegistryError::DuplicateOpcode {
                opcode,
                existing: existing.mnemonic,
                mnemonic: descriptor.mnemonic,
            });
        }

        if !(1..=3).contains(&descriptor.length) {
            return Err(RegistryError::InvalidLength {
                opcode,
                length: descriptor.length,
            });
        }

        let expected = descriptor.mode.instruction_len();
        if descriptor.length != expected {
            return Err(RegistryError::LengthMismatch {
                opcode,
                length: descriptor.length,
                mode: descriptor.mode,
                expected,
            });
        }

        let key = descriptor.mnemonic.to_ascii_uppercase();
        if let Some(&existing) = self.mnemonics.get(&key) {
            return Err(RegistryError::DuplicateMnemonic {
                mnemonic: descriptor.mnemonic,
                existing,
            });
        }

        self.mnemonics.insert(key, opcode);
        self.slots[opcode as usize] = Some(descriptor);
        Ok(self)
    }

    /// Ends the registration phase.
    pub fn build(self) -> OpcodeRegistry {
        let len = self.slots.iter().filter(|slot| slot.is_some()).count();
        OpcodeRegistry {
            slots: self.slots,
            mnemonics: self.mnemonics,
            len,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable opcode-to-descriptor table.
pub struct OpcodeRegistry {
    slots: [Option<InstructionDescriptor>; 256],
    mnemonics: HashMap<String, u8>,
    len: usize,
}

impl OpcodeRegistry {
    /// Resolves an opcode, failing for unregistered slots.
    pub fn lookup(&self, opcode: u8) -> Result<&InstructionDescriptor, RegistryError> {
        self.get(opcode).ok_or(RegistryError::UnknownOpcode(opcode))
    }

    /// Resolves an opcode, `None` for unregistered slots.
    pub fn get(&self, opcode: u8) -> Option<&InstructionDescriptor> {
        self.slots[opcode as usize].as_ref()
    }

    /// Finds a descriptor by mnemonic, ignoring ASCII case.
    pub fn find_mnemonic(&self, mnemonic: &str) -> Option<&InstructionDescriptor> {
        let opcode = *self.mnemonics.get(&mnemonic.to_ascii_uppercase())?;
        self.get(opcode)
    }

    /// Registered descriptors in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = &InstructionDescriptor> + '_ {
        self.slots.iter().flatten()
    }

    /// Number of registered opcodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("registered", &self.mnemonics.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for OpcodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpcodeRegistry")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
