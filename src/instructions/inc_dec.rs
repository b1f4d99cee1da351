//! # Increment and Decrement Instructions
//!
//! INC/DEC operate on memory, INX/INY/DEX/DEY on the index registers. All
//! wrap at 8 bits and set Z and N from the result; C and V are untouched.

use super::{Context, Flow};

pub(crate) fn inc(cx: &mut Context<'_>) -> Flow {
    cx.modify(|regs, value| {
        let result = value.wrapping_add(1);
        regs.set_zn(result);
        result
    });
    Flow::Next
}

pub(crate) fn dec(cx: &mut Context<'_>) -> Flow {
    cx.modify(|regs, value| {
        let result = value.wrapping_sub(1);
        regs.set_zn(result);
        result
    });
    Flow::Next
}

pub(crate) fn inx(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.x = regs.x.wrapping_add(1);
    let x = regs.x;
    regs.set_zn(x);
    Flow::Next
}

pub(crate) fn iny(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.y = regs.y.wrapping_add(1);
    let y = regs.y;
    regs.set_zn(y);
    Flow::Next
}

pub(crate) fn dex(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.x = regs.x.wrapping_sub(1);
    let x = regs.x;
    regs.set_zn(x);
    Flow::Next
}

pub(crate) fn dey(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.y = regs.y.wrapping_sub(1);
    let y = regs.y;
    regs.set_zn(y);
    Flow::Next
}
