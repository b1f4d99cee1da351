//! # Addressing Modes
//!
//! The 13 NMOS 6502 addressing modes. A mode fixes how many operand bytes
//! follow the opcode and how a handler turns them into a value or an
//! effective address.

use std::fmt;

/// 6502 addressing mode.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand, operation implied by the instruction (`CLC`, `RTS`).
    Implicit,

    /// Operates on the accumulator (`ASL`, `ROR`).
    Accumulator,

    /// 8-bit constant operand (`LDAI` = `LDA #$10`).
    Immediate,

    /// 8-bit address in page zero (`LDAZ` = `LDA $80`).
    ZeroPage,

    /// Zero page address plus X, wrapping within page zero (`LDAZX`).
    ZeroPageX,

    /// Zero page address plus Y, wrapping within page zero (`LDXZY`).
    ZeroPageY,

    /// Signed 8-bit offset from the address following the branch.
    Relative,

    /// Full 16-bit little-endian address (`LDAA` = `LDA $1234`).
    Absolute,

    /// Absolute address plus X. Loads pay one cycle when a page is crossed.
    AbsoluteX,

    /// Absolute address plus Y. Loads pay one cycle when a page is crossed.
    AbsoluteY,

    /// 16-bit pointer, only used by `JMPI`.
    ///
    /// Reproduces the NMOS bug: a pointer at `$xxFF` takes its high byte
    /// from `$xx00`.
    Indirect,

    /// Indexed indirect `(zp,X)`: X is added to the zero page operand, the
    /// pointer is read from there.
    IndirectX,

    /// Indirect indexed `(zp),Y`: the pointer is read from the zero page
    /// operand, then Y is added. Loads pay one cycle when a page is crossed.
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes that follow the opcode.
    pub const fn operand_len(self) -> u8 {
        use AddressingMode::*;
        match self {
            Implicit | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | Relative | IndirectX | IndirectY => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }

    /// Total instruction length for an opcode using this mode.
    pub const fn instruction_len(self) -> u8 {
        self.operand_len() + 1
    }

    /// Formats operand bytes in conventional assembly syntax.
    ///
    /// `operand` is the little-endian operand value (0 for modes without
    /// operands). Relative operands are printed as the raw offset byte.
    pub fn format_operand(self, operand: u16) -> String {
        use AddressingMode::*;
        match self {
            Implicit => String::new(),
            Accumulator => "A".to_string(),
            Immediate => format!("#${:02X}", operand as u8),
            ZeroPage | Relative => format!("${:02X}", operand as u8),
            ZeroPageX => format!("${:02X},X", operand as u8),
            ZeroPageY => format!("${:02X},Y", operand as u8),
            Absolute => format!("${:04X}", operand),
            AbsoluteX => format!("${:04X},X", operand),
            AbsoluteY => format!("${:04X},Y", operand),
            Indirect => format!("(${:04X})", operand),
            IndirectX => format!("(${:02X},X)", operand as u8),
            IndirectY => format!("(${:02X}),Y", operand as u8),
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressingMode::Implicit => "implicit",
            AddressingMode::Accumulator => "accumulator",
            AddressingMode::Immediate => "immediate",
            AddressingMode::ZeroPage => "zero page",
            AddressingMode::ZeroPageX => "zero page,X",
            AddressingMode::ZeroPageY => "zero page,Y",
            AddressingMode::Relative => "relative",
            AddressingMode::Absolute => "absolute",
            AddressingMode::AbsoluteX => "absolute,X",
            AddressingMode::AbsoluteY => "absolute,Y",
            AddressingMode::Indirect => "indirect",
            AddressingMode::IndirectX => "(indirect,X)",
            AddressingMode::IndirectY => "(indirect),Y",
        };
        f.write_str(name)
    }
}
