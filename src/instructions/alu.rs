//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic, logical and compare operations:
//! - ADC, SBC: add/subtract with carry (binary arithmetic)
//! - AND, ORA, EOR: bitwise logic on the accumulator
//! - CMP, CPX, CPY: register compare
//! - BIT: bit test
//!
//! Operands come from [`Context::load`], which also charges the
//! page-crossing cycle for indexed reads.

use super::{Context, Flow};
use crate::registers::Registers;

/// Adds `value` and the carry flag to the accumulator.
///
/// Overflow is set when both inputs share a sign the result does not.
fn add_with_carry(regs: &mut Registers, value: u8) {
    let a = regs.a;
    let sum = a as u16 + value as u16 + regs.flag_c as u16;
    let result = sum as u8;

    regs.flag_c = sum > 0xFF;
    regs.flag_v = (a ^ result) & (value ^ result) & 0x80 != 0;
    regs.a = result;
    regs.set_zn(result);
}

fn compare(regs: &mut Registers, register: u8, value: u8) {
    regs.flag_c = register >= value;
    regs.set_zn(register.wrapping_sub(value));
}

/// ADC: A = A + M + C. Flags: N V Z C.
pub(crate) fn adc(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    add_with_carry(cx.registers_mut(), value);
    Flow::Next
}

/// SBC: A = A - M - !C, computed as ADC of the one's complement.
pub(crate) fn sbc(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    add_with_carry(cx.registers_mut(), !value);
    Flow::Next
}

pub(crate) fn and(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    regs.a &= value;
    let a = regs.a;
    regs.set_zn(a);
    Flow::Next
}

pub(crate) fn ora(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    regs.a |= value;
    let a = regs.a;
    regs.set_zn(a);
    Flow::Next
}

pub(crate) fn eor(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    regs.a ^= value;
    let a = regs.a;
    regs.set_zn(a);
    Flow::Next
}

/// CMP: sets C if A >= M, Z if equal, N from bit 7 of A - M.
pub(crate) fn cmp(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    let a = regs.a;
    compare(regs, a, value);
    Flow::Next
}

pub(crate) fn cpx(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    let x = regs.x;
    compare(regs, x, value);
    Flow::Next
}

pub(crate) fn cpy(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    let y = regs.y;
    compare(regs, y, value);
    Flow::Next
}

/// BIT: Z from A & M, N and V copied from bits 7 and 6 of M.
pub(crate) fn bit(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    regs.flag_z = regs.a & value == 0;
    regs.flag_n = value & 0x80 != 0;
    regs.flag_v = value & 0x40 != 0;
    Flow::Next
}
