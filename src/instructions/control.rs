//! # Control Flow Instructions
//!
//! - BRK: force interrupt
//! - JMP, JMPI: absolute and indirect jump
//! - JSR, RTS: subroutine call and return
//! - RTI: return from interrupt
//! - NOP
//!
//! BRK is a software interrupt that:
//! 1. Pushes PC+2 to the stack (high byte first, then low byte)
//! 2. Pushes the processor status with B set
//! 3. Sets the I and B flags
//! 4. Continues at the IRQ vector at $FFFE/F
//!
//! The B flag stays set in the register file after BRK; the emulator shell
//! uses it as its halt condition.

use super::{Context, Flow};
use crate::registers::{FLAG_B, FLAG_UNUSED};

/// IRQ/BRK vector location.
pub(crate) const IRQ_VECTOR: u16 = 0xFFFE;

pub(crate) fn brk(cx: &mut Context<'_>) -> Flow {
    let return_address = cx.address().wrapping_add(2);
    cx.push_word(return_address);

    let status = cx.registers().status() | FLAG_B | FLAG_UNUSED;
    cx.push(status);

    let regs = cx.registers_mut();
    regs.flag_i = true;
    regs.flag_b = true;

    let lo = cx.read(IRQ_VECTOR);
    let hi = cx.read(IRQ_VECTOR.wrapping_add(1));
    Flow::Jump(u16::from_le_bytes([lo, hi]))
}

/// JMP and JMPI. The indirect form reproduces the page-wrap bug through
/// [`Context::effective_address`].
pub(crate) fn jmp(cx: &mut Context<'_>) -> Flow {
    Flow::Jump(cx.effective_address())
}

/// JSR pushes the address of its own last byte; RTS adds one back.
pub(crate) fn jsr(cx: &mut Context<'_>) -> Flow {
    let return_address = cx.next_address().wrapping_sub(1);
    cx.push_word(return_address);
    Flow::Jump(cx.operand_word())
}

pub(crate) fn rts(cx: &mut Context<'_>) -> Flow {
    let return_address = cx.pull_word();
    Flow::Jump(return_address.wrapping_add(1))
}

/// RTI restores status then PC. B is not a physical flip-flop, so the pulled
/// copy does not overwrite it.
pub(crate) fn rti(cx: &mut Context<'_>) -> Flow {
    let status = cx.pull();
    let regs = cx.registers_mut();
    let b = regs.flag_b;
    regs.set_status(status);
    regs.flag_b = b;

    Flow::Jump(cx.pull_word())
}

pub(crate) fn nop(_cx: &mut Context<'_>) -> Flow {
    Flow::Next
}
