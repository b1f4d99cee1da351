//! 6502 Line Assembler
//!
//! Turns whitespace-separated source lines into machine code. Mnemonics are
//! looked up in an [`OpcodeRegistry`], so the assembler speaks exactly the
//! names the registry was built with (`LDAI`, `STAZ`, `JMP`, ...) and never
//! has to infer an addressing mode from operand syntax.
//!
//! ## Syntax
//!
//! - `;` starts a comment that runs to the end of the line
//! - `$hhhh` as the first token of a line sets the origin
//! - `$hh` / `$hhhh` elsewhere emit one byte or a little-endian word,
//!   chosen by the number of digits written
//! - `#$hh` and `#ddd` emit one byte (hex or decimal)
//! - `.DATA` emits each following hex token as a byte or word
//! - a token starting in column 0 defines a label at the current address
//! - any other token is a label reference: one offset byte after a relative
//!   branch, a two-byte address otherwise
//!
//! Everything is case-insensitive. References are resolved once every line
//! has been read.
//!
//! ```
//! use emu6502::{assemble, opcodes};
//!
//! let registry = opcodes::nmos6502().unwrap();
//! let source = "\
//! $4000
//! START   LDXI #3
//! LOOP    DEX
//!         BNE LOOP
//!         BRK
//! ";
//! let program = assemble(source, &registry).unwrap();
//!
//! assert_eq!(program.origin, 0x4000);
//! assert_eq!(program.symbols.address_of("LOOP"), Some(0x4002));
//! assert_eq!(program.segments[0].bytes, [0xA2, 0x03, 0xCA, 0xD0, 0xFD, 0x00]);
//! ```

pub mod symbol_table;

use log::trace;
use thiserror::Error;

use crate::addressing::AddressingMode;
use crate::memory::MemoryBus;
use crate::registry::OpcodeRegistry;

pub use symbol_table::{Symbol, SymbolTable};

/// Contiguous run of bytes starting at one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: u16,
    pub bytes: Vec<u8>,
}

/// Assembled output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Emitted code, one segment per origin change.
    pub segments: Vec<Segment>,

    /// Every label the source defined.
    pub symbols: SymbolTable,

    /// Start of the first segment (0 when nothing was emitted).
    pub origin: u16,

    /// Address following the last emitted byte.
    pub end: u16,
}

impl Program {
    /// Writes every segment into `bus`. Bytes outside the segments are left
    /// as they were.
    pub fn load_into<B: MemoryBus + ?Sized>(&self, bus: &mut B) {
        for (address, byte) in self.bytes() {
            bus.write(address, byte);
        }
    }

    /// Emitted bytes paired with their addresses.
    pub fn bytes(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.segments.iter().flat_map(|segment| {
            segment
                .bytes
                .iter()
                .enumerate()
                .map(move |(offset, &byte)| (segment.start.wrapping_add(offset as u16), byte))
        })
    }

    /// Total number of emitted bytes.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|segment| segment.bytes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An error encountered during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AssemblerError {
    /// Line number where the error occurred (1-indexed).
    pub line: usize,

    pub kind: AssemblerErrorKind,
}

/// Classification of assembly errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerErrorKind {
    /// Too many digits for the value form.
    #[error("wrong number of digits in {token}")]
    DigitCount { token: String },

    /// Not a hexadecimal number.
    #[error("invalid hex value {token}")]
    InvalidHex { token: String },

    /// Not a decimal number.
    #[error("invalid decimal value {token}")]
    InvalidDecimal { token: String },

    /// Immediate decimal above 255.
    #[error("value {token} does not fit in a byte")]
    ValueOutOfRange { token: String },

    /// Label name that does not start with a letter or contains other than
    /// letters, digits and underscores.
    #[error("invalid label {token}")]
    InvalidLabel { token: String },

    #[error("label {label} already defined on line {previous}")]
    DuplicateLabel { label: String, previous: usize },

    #[error("undefined label {label}")]
    UndefinedLabel { label: String },

    /// Relative branch target more than -128..=127 bytes away.
    #[error("branch to {label} from ${from:04X} to ${to:04X} out of range")]
    BranchOutOfRange { label: String, from: u16, to: u16 },
}

impl AssemblerErrorKind {
    fn at(self, line: usize) -> AssemblerError {
        AssemblerError { line, kind: self }
    }
}

/// Label use waiting for the label's address.
struct Reference {
    label: String,
    line: usize,
    segment: usize,
    offset: usize,
    address: u16,
    relative: bool,
}

struct Assembler<'r> {
    registry: &'r OpcodeRegistry,
    segments: Vec<Segment>,
    symbols: SymbolTable,
    references: Vec<Reference>,
    ip: u16,
    last_mode: Option<AddressingMode>,
}

/// Assembles `source` using the mnemonics registered in `registry`.
///
/// Stops at the first error.
pub fn assemble(source: &str, registry: &OpcodeRegistry) -> Result<Program, AssemblerError> {
    let mut assembler = Assembler {
        registry,
        segments: Vec::new(),
        symbols: SymbolTable::new(),
        references: Vec::new(),
        ip: 0,
        last_mode: None,
    };

    for (index, line) in source.lines().enumerate() {
        assembler.line(index + 1, line)?;
    }
    assembler.resolve()?;

    let origin = assembler.segments.first().map_or(0, |segment| segment.start);
    Ok(Program {
        segments: assembler.segments,
        symbols: assembler.symbols,
        origin,
        end: assembler.ip,
    })
}

impl Assembler<'_> {
    fn line(&mut self, line_no: usize, line: &str) -> Result<(), AssemblerError> {
        let upper = line.to_ascii_uppercase();
        let label_column = upper.starts_with(|c: char| !c.is_whitespace());
        let mut tokens = upper.split_whitespace().enumerate();

        trace!("line {line_no}: {}", upper.trim_end());

        while let Some((position, token)) = tokens.next() {
            if token.starts_with(';') {
                break;
            }

            if let Some(digits) = token.strip_prefix('$') {
                let value = parse_hex(token, digits, 4).map_err(|kind| kind.at(line_no))?;
                if position == 0 {
                    self.set_origin(value);
                } else if digits.len() > 2 {
                    self.emit_word(value);
                    self.last_mode = None;
                } else {
                    self.emit(value as u8);
                    self.last_mode = None;
                }
            } else if let Some(value) = token.strip_prefix('#') {
                let byte = parse_immediate(token, value).map_err(|kind| kind.at(line_no))?;
                self.emit(byte);
                self.last_mode = None;
            } else if token == ".DATA" {
                self.last_mode = None;
                for (_, data) in tokens.by_ref() {
                    if data.starts_with(';') {
                        break;
                    }
                    let value = parse_hex(data, data, 4).map_err(|kind| kind.at(line_no))?;
                    if data.len() > 2 {
                        self.emit_word(value);
                    } else {
                        self.emit(value as u8);
                    }
                }
                // .DATA takes the rest of the line, comment included
                break;
            } else if position == 0 && label_column {
                self.define(line_no, token)?;
            } else if let Some(descriptor) = self.registry.find_mnemonic(token) {
                trace!("{token} -> {:02X} at {:04X}", descriptor.opcode, self.ip);
                self.last_mode = Some(descriptor.mode);
                self.emit(descriptor.opcode);
            } else {
                self.reference(line_no, token)?;
            }
        }

        Ok(())
    }

    fn set_origin(&mut self, origin: u16) {
        trace!("origin {origin:04X}");
        self.ip = origin;
        if self.segments.last().is_some_and(|segment| segment.bytes.is_empty()) {
            self.segments.pop();
        }
        self.segments.push(Segment {
            start: origin,
            bytes: Vec::new(),
        });
    }

    fn emit(&mut self, byte: u8) {
        if self.segments.is_empty() {
            self.segments.push(Segment {
                start: self.ip,
                bytes: Vec::new(),
            });
        }
        if let Some(segment) = self.segments.last_mut() {
            segment.bytes.push(byte);
        }
        self.ip = self.ip.wrapping_add(1);
    }

    fn emit_word(&mut self, word: u16) {
        let [lo, hi] = word.to_le_bytes();
        self.emit(lo);
        self.emit(hi);
    }

    fn define(&mut self, line_no: usize, token: &str) -> Result<(), AssemblerError> {
        if !is_label(token) {
            return Err(AssemblerErrorKind::InvalidLabel {
                token: token.to_string(),
            }
            .at(line_no));
        }

        trace!("label {token} = {:04X}", self.ip);
        self.symbols
            .define(token, self.ip, line_no)
            .map_err(|existing| {
                AssemblerErrorKind::DuplicateLabel {
                    label: token.to_string(),
                    previous: existing.defined_at,
                }
                .at(line_no)
            })
    }

    fn reference(&mut self, line_no: usize, token: &str) -> Result<(), AssemblerError> {
        if !is_label(token) {
            return Err(AssemblerErrorKind::InvalidLabel {
                token: token.to_string(),
            }
            .at(line_no));
        }

        let relative = self.last_mode == Some(AddressingMode::Relative);
        let address = self.ip;

        // Reserve the operand so the segment exists before recording it.
        if relative {
            self.emit(0);
        } else {
            self.emit_word(0);
        }

        let segment = self.segments.len() - 1;
        let width = if relative { 1 } else { 2 };
        let offset = self.segments[segment].bytes.len() - width;

        trace!("reference {token} at {address:04X} relative={relative}");
        self.references.push(Reference {
            label: token.to_string(),
            line: line_no,
            segment,
            offset,
            address,
            relative,
        });
        self.last_mode = None;
        Ok(())
    }

    fn resolve(&mut self) -> Result<(), AssemblerError> {
        for reference in &self.references {
            let target = self.symbols.address_of(&reference.label).ok_or_else(|| {
                AssemblerErrorKind::UndefinedLabel {
                    label: reference.label.clone(),
                }
                .at(reference.line)
            })?;

            let bytes = &mut self.segments[reference.segment].bytes;
            if reference.relative {
                let from = reference.address.wrapping_add(1);
                let delta = target.wrapping_sub(from) as i16;
                if !(-128..=127).contains(&delta) {
                    return Err(AssemblerErrorKind::BranchOutOfRange {
                        label: reference.label.clone(),
                        from,
                        to: target,
                    }
                    .at(reference.line));
                }
                bytes[reference.offset] = delta as u8;
            } else {
                let [lo, hi] = target.to_le_bytes();
                bytes[reference.offset] = lo;
                bytes[reference.offset + 1] = hi;
            }

            trace!("resolved {} to {target:04X}", reference.label);
        }
        Ok(())
    }
}

fn parse_hex(token: &str, digits: &str, max_digits: usize) -> Result<u16, AssemblerErrorKind> {
    if digits.len() > max_digits {
        return Err(AssemblerErrorKind::DigitCount {
            token: token.to_string(),
        });
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AssemblerErrorKind::InvalidHex {
            token: token.to_string(),
        });
    }
    u16::from_str_radix(digits, 16).map_err(|_| AssemblerErrorKind::InvalidHex {
        token: token.to_string(),
    })
}

fn parse_immediate(token: &str, value: &str) -> Result<u8, AssemblerErrorKind> {
    if let Some(digits) = value.strip_prefix('$') {
        return parse_hex(token, digits, 2).map(|byte| byte as u8);
    }

    if value.len() > 3 {
        return Err(AssemblerErrorKind::DigitCount {
            token: token.to_string(),
        });
    }
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AssemblerErrorKind::InvalidDecimal {
            token: token.to_string(),
        });
    }

    let number: u16 = value.parse().map_err(|_| AssemblerErrorKind::InvalidDecimal {
        token: token.to_string(),
    })?;
    u8::try_from(number).map_err(|_| AssemblerErrorKind::ValueOutOfRange {
        token: token.to_string(),
    })
}

/// Labels start with a letter and continue with letters, digits or `_`.
fn is_label(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_label() {
        assert!(is_label("START"));
        assert!(is_label("LOOP_1"));
        assert!(is_label("A"));
        assert!(!is_label(""));
        assert!(!is_label("1START"));
        assert!(!is_label("MY-LABEL"));
        assert!(!is_label("(PTR)"));
    }

    #[test]
    fn test_parse_immediate() {
        assert_eq!(parse_immediate("#$FF", "$FF"), Ok(0xFF));
        assert_eq!(parse_immediate("#255", "255"), Ok(255));
        assert_eq!(parse_immediate("#7", "7"), Ok(7));
        assert!(matches!(
            parse_immediate("#256", "256"),
            Err(AssemblerErrorKind::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            parse_immediate("#$123", "$123"),
            Err(AssemblerErrorKind::DigitCount { .. })
        ));
        assert!(matches!(
            parse_immediate("#1000", "1000"),
            Err(AssemblerErrorKind::DigitCount { .. })
        ));
        assert!(matches!(
            parse_immediate("#X", "X"),
            Err(AssemblerErrorKind::InvalidDecimal { .. })
        ));
    }

    #[test]
    fn test_parse_hex_digit_limit() {
        assert_eq!(parse_hex("$1234", "1234", 4), Ok(0x1234));
        assert!(matches!(
            parse_hex("$12345", "12345", 4),
            Err(AssemblerErrorKind::DigitCount { .. })
        ));
        assert!(matches!(
            parse_hex("$G0", "G0", 4),
            Err(AssemblerErrorKind::InvalidHex { .. })
        ));
    }
}
