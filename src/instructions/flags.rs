//! # Flag Instructions
//!
//! Single-flag set and clear operations. All are implied, 1 byte, 2 cycles.

use super::{Context, Flow};

pub(crate) fn clc(cx: &mut Context<'_>) -> Flow {
    cx.registers_mut().flag_c = false;
    Flow::Next
}

pub(crate) fn sec(cx: &mut Context<'_>) -> Flow {
    cx.registers_mut().flag_c = true;
    Flow::Next
}

pub(crate) fn cli(cx: &mut Context<'_>) -> Flow {
    cx.registers_mut().flag_i = false;
    Flow::Next
}

pub(crate) fn sei(cx: &mut Context<'_>) -> Flow {
    cx.registers_mut().flag_i = true;
    Flow::Next
}

pub(crate) fn cld(cx: &mut Context<'_>) -> Flow {
    cx.registers_mut().flag_d = false;
    Flow::Next
}

/// Sets D. Arithmetic stays binary regardless.
pub(crate) fn sed(cx: &mut Context<'_>) -> Flow {
    cx.registers_mut().flag_d = true;
    Flow::Next
}

pub(crate) fn clv(cx: &mut Context<'_>) -> Flow {
    cx.registers_mut().flag_v = false;
    Flow::Next
}
