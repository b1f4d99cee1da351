//! Tests for the arithmetic and logic instructions.
//!
//! Tests cover:
//! - ADC/SBC carry, overflow and binary-only behavior with D set
//! - AND, ORA, EOR results and flags
//! - CMP, CPX, CPY carry/zero/negative rules
//! - BIT flag transfer

use std::sync::Arc;

use emu6502::{opcodes, FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory, Arc::new(opcodes::nmos6502().unwrap()))
}

/// Runs one immediate-mode instruction with the given A and carry.
fn run_immediate(opcode: u8, a: u8, carry: bool, operand: u8) -> CPU<FlatMemory> {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x8000, &[opcode, operand]);
    cpu.set_a(a);
    cpu.set_flag_c(carry);
    cpu.step().unwrap();
    cpu
}

// ========== ADC ==========

#[test]
fn test_adc_simple() {
    let cpu = run_immediate(0x69, 0x10, false, 0x20);

    assert_eq!(cpu.a(), 0x30);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_v());
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
    assert_eq!(cpu.cycles(), 2);
}

#[test]
fn test_adc_carry_in() {
    let cpu = run_immediate(0x69, 0x01, true, 0x01);
    assert_eq!(cpu.a(), 0x03);
}

#[test]
fn test_adc_carry_out_and_zero() {
    let cpu = run_immediate(0x69, 0xFF, false, 0x01);

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());
    assert!(!cpu.flag_v());
}

#[test]
fn test_adc_signed_overflow() {
    // 0x50 + 0x50 = 0xA0: two positives give a negative
    let cpu = run_immediate(0x69, 0x50, false, 0x50);

    assert_eq!(cpu.a(), 0xA0);
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert!(!cpu.flag_c());
}

#[test]
fn test_adc_ignores_decimal_flag() {
    let mut cpu = setup_cpu();
    // SED, ADCI #$01
    cpu.memory_mut().load(0x8000, &[0xF8, 0x69, 0x01]);
    cpu.set_a(0x09);
    cpu.set_flag_c(false);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert!(cpu.flag_d());
    assert_eq!(cpu.a(), 0x0A);
}

#[test]
fn test_adc_absolute_x_page_cross() {
    let mut cpu = setup_cpu();
    // ADCX $10FF with X=1
    cpu.memory_mut().load(0x8000, &[0x7D, 0xFF, 0x10]);
    cpu.memory_mut().write(0x1100, 0x05);
    cpu.set_a(0x01);
    cpu.set_x(0x01);
    cpu.set_flag_c(false);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x06);
    assert_eq!(cpu.cycles(), 5);
}

// ========== SBC ==========

#[test]
fn test_sbc_no_borrow() {
    let cpu = run_immediate(0xE9, 0x50, true, 0x20);

    assert_eq!(cpu.a(), 0x30);
    assert!(cpu.flag_c());
    assert!(!cpu.flag_v());
}

#[test]
fn test_sbc_borrow() {
    let cpu = run_immediate(0xE9, 0x10, true, 0x20);

    assert_eq!(cpu.a(), 0xF0);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
}

#[test]
fn test_sbc_carry_clear_subtracts_one_more() {
    let cpu = run_immediate(0xE9, 0x10, false, 0x01);
    assert_eq!(cpu.a(), 0x0E);
    assert!(cpu.flag_c());
}

#[test]
fn test_sbc_signed_overflow() {
    // -128 - 1 overflows to +127
    let cpu = run_immediate(0xE9, 0x80, true, 0x01);

    assert_eq!(cpu.a(), 0x7F);
    assert!(cpu.flag_v());
    assert!(cpu.flag_c());
    assert!(!cpu.flag_n());
}

// ========== Logic ==========

#[test]
fn test_and() {
    let cpu = run_immediate(0x29, 0xF0, false, 0x0F);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());

    let cpu = run_immediate(0x29, 0xF0, false, 0x80);
    assert_eq!(cpu.a(), 0x80);
    assert!(cpu.flag_n());
}

#[test]
fn test_ora() {
    let cpu = run_immediate(0x09, 0x0F, false, 0x30);
    assert_eq!(cpu.a(), 0x3F);
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
}

#[test]
fn test_eor() {
    let cpu = run_immediate(0x49, 0xFF, false, 0xFF);
    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());

    let cpu = run_immediate(0x49, 0x0F, false, 0xFF);
    assert_eq!(cpu.a(), 0xF0);
    assert!(cpu.flag_n());
}

#[test]
fn test_and_zero_page() {
    let mut cpu = setup_cpu();
    // ANDZ $20
    cpu.memory_mut().load(0x8000, &[0x25, 0x20]);
    cpu.memory_mut().write(0x0020, 0x3C);
    cpu.set_a(0x0F);

    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x0C);
    assert_eq!(cpu.cycles(), 3);
}

// ========== Compare ==========

#[test]
fn test_cmp_equal() {
    let cpu = run_immediate(0xC9, 0x40, false, 0x40);

    assert!(cpu.flag_z());
    assert!(cpu.flag_c());
    assert!(!cpu.flag_n());
    assert_eq!(cpu.a(), 0x40);
}

#[test]
fn test_cmp_less() {
    let cpu = run_immediate(0xC9, 0x40, true, 0x50);

    assert!(!cpu.flag_z());
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
}

#[test]
fn test_cmp_greater() {
    let cpu = run_immediate(0xC9, 0x50, false, 0x40);

    assert!(!cpu.flag_z());
    assert!(cpu.flag_c());
    assert!(!cpu.flag_n());
}

#[test]
fn test_cpx_cpy() {
    let mut cpu = setup_cpu();
    // CPXI #$10, CPYI #$20
    cpu.memory_mut().load(0x8000, &[0xE0, 0x10, 0xC0, 0x20]);
    cpu.set_x(0x10);
    cpu.set_y(0x10);

    cpu.step().unwrap();
    assert!(cpu.flag_z());
    assert!(cpu.flag_c());

    cpu.step().unwrap();
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
}

// ========== BIT ==========

#[test]
fn test_bit_zero_page() {
    let mut cpu = setup_cpu();
    // BITZ $10
    cpu.memory_mut().load(0x8000, &[0x24, 0x10]);
    cpu.memory_mut().write(0x0010, 0xC0);
    cpu.set_a(0x01);

    cpu.step().unwrap();

    assert!(cpu.flag_z());
    assert!(cpu.flag_n());
    assert!(cpu.flag_v());
    assert_eq!(cpu.a(), 0x01);
    assert_eq!(cpu.cycles(), 3);
}

#[test]
fn test_bit_absolute() {
    let mut cpu = setup_cpu();
    // BIT $1234
    cpu.memory_mut().load(0x8000, &[0x2C, 0x34, 0x12]);
    cpu.memory_mut().write(0x1234, 0x01);
    cpu.set_a(0x01);
    cpu.set_flag_v(true);
    cpu.set_flag_n(true);

    cpu.step().unwrap();

    assert!(!cpu.flag_z());
    assert!(!cpu.flag_n());
    assert!(!cpu.flag_v());
    assert_eq!(cpu.cycles(), 4);
}
