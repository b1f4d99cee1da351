//! Tests for the line assembler.
//!
//! Tests cover:
//! - Origins and segments
//! - Byte/word emission by digit count, immediates and `.DATA`
//! - Labels: definitions, forward/backward references, relative offsets
//! - Error reporting with line numbers

use emu6502::assembler::Segment;
use emu6502::{assemble, opcodes, AssemblerError, AssemblerErrorKind, FlatMemory, MemoryBus, OpcodeRegistry, Program};

fn registry() -> OpcodeRegistry {
    opcodes::nmos6502().unwrap()
}

fn assemble_ok(source: &str) -> Program {
    assemble(source, &registry()).unwrap()
}

fn assemble_err(source: &str) -> AssemblerError {
    assemble(source, &registry()).unwrap_err()
}

/// All emitted bytes in address order, for single-segment programs.
fn code(program: &Program) -> Vec<u8> {
    program.bytes().map(|(_, byte)| byte).collect()
}

// ========== Basic Emission ==========

#[test]
fn test_simple_program() {
    let program = assemble_ok(
        "$4000
  LDAI #$07
  STAA $0200
  BRK
",
    );

    assert_eq!(program.origin, 0x4000);
    assert_eq!(program.end, 0x4006);
    assert_eq!(program.len(), 6);
    assert_eq!(code(&program), [0xA9, 0x07, 0x8D, 0x00, 0x02, 0x00]);
}

#[test]
fn test_default_origin_is_zero() {
    let program = assemble_ok("  NOP\n  NOP\n");

    assert_eq!(program.origin, 0x0000);
    assert_eq!(program.end, 0x0002);
    assert_eq!(
        program.segments,
        [Segment {
            start: 0,
            bytes: vec![0xEA, 0xEA]
        }]
    );
}

#[test]
fn test_empty_source() {
    let program = assemble_ok("; nothing here\n\n");

    assert!(program.is_empty());
    assert!(program.segments.is_empty());
    assert_eq!(program.origin, 0);
}

#[test]
fn test_origin_change_starts_new_segment() {
    let program = assemble_ok(
        "$1000
  NOP
$2000
  BRK
",
    );

    assert_eq!(program.origin, 0x1000);
    assert_eq!(program.end, 0x2001);
    assert_eq!(
        program.segments,
        [
            Segment {
                start: 0x1000,
                bytes: vec![0xEA]
            },
            Segment {
                start: 0x2000,
                bytes: vec![0x00]
            },
        ]
    );
}

#[test]
fn test_hex_width_follows_digit_count() {
    let program = assemble_ok("$0300\n  LDAZ $10\n  LDAA $0010\n  LDAA $012\n");

    assert_eq!(
        code(&program),
        [0xA5, 0x10, 0xAD, 0x10, 0x00, 0xAD, 0x12, 0x00]
    );
}

#[test]
fn test_immediate_forms() {
    let program = assemble_ok("  LDAI #$ff\n  LDXI #255\n  LDYI #0\n  LDAI #$7\n");

    assert_eq!(
        code(&program),
        [0xA9, 0xFF, 0xA2, 0xFF, 0xA0, 0x00, 0xA9, 0x07]
    );
}

#[test]
fn test_data_directive() {
    let program = assemble_ok("$0400\n  .DATA 01 0203 ff ; trailing comment\n  NOP\n");

    assert_eq!(code(&program), [0x01, 0x03, 0x02, 0xFF, 0xEA]);
    assert_eq!(program.end, 0x0405);
}

#[test]
fn test_data_comment_ends_line() {
    // The comment word names a defined label and must not be referenced
    let program = assemble_ok("$0400\nLOOP .DATA 01 ; LOOP\n");

    assert_eq!(code(&program), [0x01]);
    assert_eq!(program.end, 0x0401);
}

#[test]
fn test_case_and_comments() {
    let program = assemble_ok(
        "; header comment
$1000
start   ldai #$01   ; load one
        jmp START
",
    );

    assert_eq!(program.symbols.address_of("START"), Some(0x1000));
    assert_eq!(code(&program), [0xA9, 0x01, 0x4C, 0x00, 0x10]);
}

// ========== Labels ==========

#[test]
fn test_forward_absolute_reference() {
    let program = assemble_ok(
        "$1000
        JMP END
        NOP
END     BRK
",
    );

    assert_eq!(program.symbols.address_of("END"), Some(0x1004));
    assert_eq!(code(&program), [0x4C, 0x04, 0x10, 0xEA, 0x00]);
}

#[test]
fn test_subroutine_call() {
    let program = assemble_ok(
        "$8000
        JSR SUB
        BRK
SUB     INX
        RTS
",
    );

    assert_eq!(code(&program), [0x20, 0x04, 0x80, 0x00, 0xE8, 0x60]);
    assert_eq!(program.symbols.name_at(0x8004), Some("SUB"));
}

#[test]
fn test_backward_branch() {
    let program = assemble_ok(
        "$4000
START   LDXI #3
LOOP    DEX
        BNE LOOP
        BRK
",
    );

    assert_eq!(code(&program), [0xA2, 0x03, 0xCA, 0xD0, 0xFD, 0x00]);
    assert_eq!(program.symbols.len(), 2);
}

#[test]
fn test_forward_branch() {
    let program = assemble_ok(
        "$2000
        BEQ DONE
        NOP
DONE    BRK
",
    );

    assert_eq!(code(&program), [0xF0, 0x01, 0xEA, 0x00]);
}

#[test]
fn test_reference_after_branch_operand_is_absolute() {
    let program = assemble_ok(
        "$1000
START   BNE $05
        START
",
    );

    // The branch already has its offset, so START is a plain address
    assert_eq!(code(&program), [0xD0, 0x05, 0x00, 0x10]);
}

#[test]
fn test_label_only_line() {
    let program = assemble_ok("$3000\nHERE\n  JMP HERE\n");

    assert_eq!(program.symbols.address_of("HERE"), Some(0x3000));
    assert_eq!(code(&program), [0x4C, 0x00, 0x30]);
}

#[test]
fn test_symbols_iterate_in_name_order() {
    let program = assemble_ok("ZED NOP\nALPHA NOP\nMID NOP\n");
    let names: Vec<&str> = program.symbols.iter().map(|s| s.name.as_str()).collect();

    assert_eq!(names, ["ALPHA", "MID", "ZED"]);
}

// ========== Errors ==========

#[test]
fn test_duplicate_label() {
    let err = assemble_err("TWICE NOP\n  NOP\nTWICE NOP\n");

    assert_eq!(err.line, 3);
    assert_eq!(
        err.kind,
        AssemblerErrorKind::DuplicateLabel {
            label: "TWICE".to_string(),
            previous: 1
        }
    );
}

#[test]
fn test_undefined_label() {
    let err = assemble_err("  NOP\n  JMP NOWHERE\n");

    assert_eq!(err.line, 2);
    assert_eq!(
        err.kind,
        AssemblerErrorKind::UndefinedLabel {
            label: "NOWHERE".to_string()
        }
    );
    assert_eq!(err.to_string(), "line 2: undefined label NOWHERE");
}

#[test]
fn test_branch_out_of_range() {
    let err = assemble_err(
        "$1000
        BNE FAR
$1100
FAR     BRK
",
    );

    assert_eq!(err.line, 2);
    assert_eq!(
        err.kind,
        AssemblerErrorKind::BranchOutOfRange {
            label: "FAR".to_string(),
            from: 0x1002,
            to: 0x1100
        }
    );
}

#[test]
fn test_invalid_labels() {
    let err = assemble_err("1ABC NOP\n");
    assert!(matches!(err.kind, AssemblerErrorKind::InvalidLabel { .. }));

    let err = assemble_err("  JMP 9X\n");
    assert!(matches!(err.kind, AssemblerErrorKind::InvalidLabel { .. }));
}

#[test]
fn test_value_errors() {
    let cases = [
        ("  LDAI #256\n", "ValueOutOfRange"),
        ("  LDAI #1000\n", "DigitCount"),
        ("  LDAI #$123\n", "DigitCount"),
        ("  LDAI #12A\n", "InvalidDecimal"),
        ("  LDAA $12345\n", "DigitCount"),
        ("  LDAA $GG\n", "InvalidHex"),
        ("  .DATA 1G\n", "InvalidHex"),
    ];

    for (source, expected) in cases {
        let err = assemble_err(source);
        let kind = match err.kind {
            AssemblerErrorKind::ValueOutOfRange { .. } => "ValueOutOfRange",
            AssemblerErrorKind::DigitCount { .. } => "DigitCount",
            AssemblerErrorKind::InvalidDecimal { .. } => "InvalidDecimal",
            AssemblerErrorKind::InvalidHex { .. } => "InvalidHex",
            ref other => panic!("{source:?}: unexpected {other:?}"),
        };
        assert_eq!(kind, expected, "{source:?}");
        assert_eq!(err.line, 1);
    }
}

// ========== Loading ==========

#[test]
fn test_load_into_memory() {
    let program = assemble_ok("$0600\n  LDAI #$01\n$0700\n  .DATA BEEF\n");
    let mut memory = FlatMemory::new();
    memory.write(0x0602, 0x77);

    program.load_into(&mut memory);

    assert_eq!(memory.read(0x0600), 0xA9);
    assert_eq!(memory.read(0x0601), 0x01);
    assert_eq!(memory.read(0x0602), 0x77);
    assert_eq!(memory.read(0x0700), 0xEF);
    assert_eq!(memory.read(0x0701), 0xBE);
}
