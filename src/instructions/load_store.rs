//! # Load and Store Instructions
//!
//! Loads set Z and N from the loaded value and pay the page-crossing cycle
//! for indexed modes. Stores affect no flags and always take their base
//! cycle count.

use super::{Context, Flow};

pub(crate) fn lda(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    regs.a = value;
    regs.set_zn(value);
    Flow::Next
}

pub(crate) fn ldx(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    regs.x = value;
    regs.set_zn(value);
    Flow::Next
}

pub(crate) fn ldy(cx: &mut Context<'_>) -> Flow {
    let value = cx.load();
    let regs = cx.registers_mut();
    regs.y = value;
    regs.set_zn(value);
    Flow::Next
}

pub(crate) fn sta(cx: &mut Context<'_>) -> Flow {
    let a = cx.registers().a;
    cx.store(a);
    Flow::Next
}

pub(crate) fn stx(cx: &mut Context<'_>) -> Flow {
    let x = cx.registers().x;
    cx.store(x);
    Flow::Next
}

pub(crate) fn sty(cx: &mut Context<'_>) -> Flow {
    let y = cx.registers().y;
    cx.store(y);
    Flow::Next
}
