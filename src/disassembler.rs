//! 6502 Disassembler Module
//!
//! Decodes machine code in memory back into registry mnemonics. Bytes that
//! are not registered opcodes decode as one-byte `.BYTE` entries so a
//! listing can always make progress.

use std::fmt;

use crate::addressing::AddressingMode;
use crate::memory::MemoryBus;
use crate::registry::{InstructionDescriptor, OpcodeRegistry};

/// Mnemonic shown for bytes with no descriptor.
pub const DATA_MNEMONIC: &str = ".BYTE";

/// A single decoded instruction.
#[derive(Debug, Clone, Copy)]
pub struct Decoded {
    /// Memory address where this instruction starts.
    pub address: u16,

    /// The opcode byte value (0x00-0xFF).
    pub opcode: u8,

    /// Registry entry for the opcode, `None` for unregistered bytes.
    pub descriptor: Option<InstructionDescriptor>,

    operand: [u8; 2],
}

impl Decoded {
    pub fn mnemonic(&self) -> &'static str {
        self.descriptor.map_or(DATA_MNEMONIC, |d| d.mnemonic)
    }

    /// Bytes covered by this entry (1 for unregistered opcodes).
    pub fn length(&self) -> u8 {
        self.descriptor.map_or(1, |d| d.length)
    }

    /// Operand bytes following the opcode.
    pub fn operand(&self) -> &[u8] {
        &self.operand[..self.length() as usize - 1]
    }

    /// Address of the following entry.
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(self.length() as u16)
    }

    /// Conventional assembly text, e.g. `LDA #$42`, `BNE $4002`.
    ///
    /// Registry mnemonics carry an addressing suffix after the three-letter
    /// operation; this drops the suffix and spells the mode out as operand
    /// syntax instead.
    pub fn assembly(&self) -> String {
        let Some(descriptor) = self.descriptor else {
            return format!("{DATA_MNEMONIC} ${:02X}", self.opcode);
        };

        let operation = descriptor.mnemonic.get(..3).unwrap_or(descriptor.mnemonic);
        let operand = match descriptor.mode {
            AddressingMode::Relative => {
                let offset = self.operand[0] as i8;
                format!("${:04X}", self.next_address().wrapping_add_signed(offset as i16))
            }
            mode => mode.format_operand(u16::from_le_bytes(self.operand)),
        };

        if operand.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {operand}")
        }
    }
}

impl fmt::Display for Decoded {
    /// `PC=8000 LDAI 42`: address, registry mnemonic, raw operand bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PC={:04X} {}", self.address, self.mnemonic())?;
        if self.descriptor.is_none() {
            return write!(f, " {:02X}", self.opcode);
        }
        for byte in self.operand() {
            write!(f, " {byte:02X}")?;
        }
        Ok(())
    }
}

/// Decodes the instruction at `address`. Operand reads wrap at 0xFFFF.
pub fn decode_at<B: MemoryBus + ?Sized>(
    bus: &B,
    registry: &OpcodeRegistry,
    address: u16,
) -> Decoded {
    let opcode = bus.read(address);
    let descriptor = registry.get(opcode).copied();

    let mut operand = [0u8; 2];
    let operand_len = descriptor.map_or(0, |d| d.operand_len() as usize);
    for (offset, byte) in operand.iter_mut().take(operand_len).enumerate() {
        *byte = bus.read(address.wrapping_add(1 + offset as u16));
    }

    Decoded {
        address,
        opcode,
        descriptor,
        operand,
    }
}

/// Decodes every instruction starting in `first..=last`.
///
/// Stops early instead of wrapping past 0xFFFF.
pub fn list<B: MemoryBus + ?Sized>(
    bus: &B,
    registry: &OpcodeRegistry,
    first: u16,
    last: u16,
) -> Vec<Decoded> {
    let mut listing = Vec::new();
    let mut address = first as u32;

    while address <= last as u32 {
        let decoded = decode_at(bus, registry, address as u16);
        address += decoded.length() as u32;
        listing.push(decoded);
    }

    listing
}
