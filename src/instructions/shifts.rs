//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL and ROR in accumulator and memory forms. The bit shifted
//! out lands in C; Z and N follow the result.

use super::{Context, Flow};

pub(crate) fn asl(cx: &mut Context<'_>) -> Flow {
    cx.modify(|regs, value| {
        let result = value << 1;
        regs.flag_c = value & 0x80 != 0;
        regs.set_zn(result);
        result
    });
    Flow::Next
}

pub(crate) fn lsr(cx: &mut Context<'_>) -> Flow {
    cx.modify(|regs, value| {
        let result = value >> 1;
        regs.flag_c = value & 0x01 != 0;
        regs.set_zn(result);
        result
    });
    Flow::Next
}

/// ROL: carry enters at bit 0, bit 7 leaves into carry.
pub(crate) fn rol(cx: &mut Context<'_>) -> Flow {
    cx.modify(|regs, value| {
        let result = (value << 1) | regs.flag_c as u8;
        regs.flag_c = value & 0x80 != 0;
        regs.set_zn(result);
        result
    });
    Flow::Next
}

/// ROR: carry enters at bit 7, bit 0 leaves into carry.
pub(crate) fn ror(cx: &mut Context<'_>) -> Flow {
    cx.modify(|regs, value| {
        let result = (value >> 1) | ((regs.flag_c as u8) << 7);
        regs.flag_c = value & 0x01 != 0;
        regs.set_zn(result);
        result
    });
    Flow::Next
}
