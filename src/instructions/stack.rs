//! # Stack Operations
//!
//! The 6502 stack lives at 0x0100-0x01FF and grows downward. SP is an 8-bit
//! offset into that page and wraps in both directions.

use super::{Context, Flow};
use crate::registers::{FLAG_B, FLAG_UNUSED};

pub(crate) fn pha(cx: &mut Context<'_>) -> Flow {
    let a = cx.registers().a;
    cx.push(a);
    Flow::Next
}

/// PHP always pushes B and the unused bit as 1.
pub(crate) fn php(cx: &mut Context<'_>) -> Flow {
    let status = cx.registers().status() | FLAG_B | FLAG_UNUSED;
    cx.push(status);
    Flow::Next
}

pub(crate) fn pla(cx: &mut Context<'_>) -> Flow {
    let value = cx.pull();
    let regs = cx.registers_mut();
    regs.a = value;
    regs.set_zn(value);
    Flow::Next
}

/// PLP restores every flag except B.
pub(crate) fn plp(cx: &mut Context<'_>) -> Flow {
    let status = cx.pull();
    let regs = cx.registers_mut();
    let b = regs.flag_b;
    regs.set_status(status);
    regs.flag_b = b;
    Flow::Next
}
