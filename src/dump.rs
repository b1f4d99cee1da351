//! Text dumps of machine state for the debugger and the `-p` flag.
//!
//! Each function returns the text instead of printing it so callers choose
//! the stream.

use std::fmt::Write as _;

use crate::memory::MemoryBus;
use crate::registers::Registers;
use crate::registry::OpcodeRegistry;

/// `PC=4000 SP=ff A=00 X=00 Y=00 P=20`
pub fn registers(regs: &Registers) -> String {
    format!(
        "PC={:04x} SP={:02x} A={:02x} X={:02x} Y={:02x} P={:02x}",
        regs.pc,
        regs.sp,
        regs.a,
        regs.x,
        regs.y,
        regs.status()
    )
}

/// `S=0 V=0 B=0 D=0 I=0 Z=0 C=0`, where S is the sign (N) flag.
pub fn flags(regs: &Registers) -> String {
    format!(
        "S={} V={} B={} D={} I={} Z={} C={}",
        regs.flag_n as u8,
        regs.flag_v as u8,
        regs.flag_b as u8,
        regs.flag_d as u8,
        regs.flag_i as u8,
        regs.flag_z as u8,
        regs.flag_c as u8
    )
}

/// Stack contents from the top of the stack page down to the byte above SP.
pub fn stack<B: MemoryBus + ?Sized>(regs: &Registers, bus: &B) -> String {
    let mut out = String::from("stack:");
    for offset in (regs.sp as u16 + 1..=0xFF).rev() {
        let _ = write!(out, " {:02x}", bus.read(0x0100 | offset));
    }
    out
}

/// Hex dump of `first..=last` in rows of eight, each row starting at a
/// multiple of eight.
pub fn memory<B: MemoryBus + ?Sized>(bus: &B, first: u16, last: u16) -> String {
    let mut out = String::new();
    let last = last as u32;
    let mut row = (first & !0x7) as u32;

    while row <= last {
        let _ = write!(out, "{row:04x}");
        for address in row..=(row + 7).min(last) {
            let _ = write!(out, " {:02x}", bus.read(address as u16));
        }
        out.push('\n');
        row += 8;
    }

    out
}

/// One `MNEMONIC - description` line per registered opcode, in opcode order.
pub fn instructions(registry: &OpcodeRegistry) -> String {
    let mut out = String::new();
    for descriptor in registry.iter() {
        let _ = writeln!(out, "{} - {}", descriptor.mnemonic, descriptor.description);
    }
    out
}
