//! # Register Transfer Instructions
//!
//! Every transfer except TXS sets Z and N from the copied value.

use super::{Context, Flow};

pub(crate) fn tax(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.x = regs.a;
    let x = regs.x;
    regs.set_zn(x);
    Flow::Next
}

pub(crate) fn tay(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.y = regs.a;
    let y = regs.y;
    regs.set_zn(y);
    Flow::Next
}

pub(crate) fn txa(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.a = regs.x;
    let a = regs.a;
    regs.set_zn(a);
    Flow::Next
}

pub(crate) fn tya(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.a = regs.y;
    let a = regs.a;
    regs.set_zn(a);
    Flow::Next
}

pub(crate) fn tsx(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.x = regs.sp;
    let x = regs.x;
    regs.set_zn(x);
    Flow::Next
}

/// TXS: SP = X. No flags.
pub(crate) fn txs(cx: &mut Context<'_>) -> Flow {
    let regs = cx.registers_mut();
    regs.sp = regs.x;
    Flow::Next
}
