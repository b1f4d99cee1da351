//! # Branch Instructions
//!
//! All eight conditional branches use relative addressing with a signed
//! 8-bit offset from the address of the following instruction.
//!
//! Cycle timing:
//! - 2 cycles if the branch is not taken
//! - 3 cycles if taken to the same page
//! - 4 cycles if taken across a page boundary
//!
//! No flags are affected.

use super::{Context, Flow};

fn branch_if(cx: &mut Context<'_>, condition: bool) -> Flow {
    if !condition {
        return Flow::Next;
    }

    let from = cx.next_address();
    let target = cx.effective_address();
    cx.penalty(1);
    if from & 0xFF00 != target & 0xFF00 {
        cx.penalty(1);
    }
    Flow::Jump(target)
}

pub(crate) fn bcc(cx: &mut Context<'_>) -> Flow {
    let c = cx.registers().flag_c;
    branch_if(cx, !c)
}

pub(crate) fn bcs(cx: &mut Context<'_>) -> Flow {
    let c = cx.registers().flag_c;
    branch_if(cx, c)
}

pub(crate) fn beq(cx: &mut Context<'_>) -> Flow {
    let z = cx.registers().flag_z;
    branch_if(cx, z)
}

pub(crate) fn bne(cx: &mut Context<'_>) -> Flow {
    let z = cx.registers().flag_z;
    branch_if(cx, !z)
}

pub(crate) fn bmi(cx: &mut Context<'_>) -> Flow {
    let n = cx.registers().flag_n;
    branch_if(cx, n)
}

pub(crate) fn bpl(cx: &mut Context<'_>) -> Flow {
    let n = cx.registers().flag_n;
    branch_if(cx, !n)
}

pub(crate) fn bvc(cx: &mut Context<'_>) -> Flow {
    let v = cx.registers().flag_v;
    branch_if(cx, !v)
}

pub(crate) fn bvs(cx: &mut Context<'_>) -> Flow {
    let v = cx.registers().flag_v;
    branch_if(cx, v)
}
