//! # Register File
//!
//! Programmer-visible 6502 state: accumulator, index registers, program
//! counter, stack pointer and the seven status flags. Instruction handlers
//! mutate this through their execution context; the dispatcher owns it.

/// Negative flag bit in the packed status byte.
pub const FLAG_N: u8 = 0b1000_0000;
/// Overflow flag bit.
pub const FLAG_V: u8 = 0b0100_0000;
/// Unused bit, always reads as 1.
pub const FLAG_UNUSED: u8 = 0b0010_0000;
/// Break flag bit.
pub const FLAG_B: u8 = 0b0001_0000;
/// Decimal mode flag bit.
pub const FLAG_D: u8 = 0b0000_1000;
/// Interrupt disable flag bit.
pub const FLAG_I: u8 = 0b0000_0100;
/// Zero flag bit.
pub const FLAG_Z: u8 = 0b0000_0010;
/// Carry flag bit.
pub const FLAG_C: u8 = 0b0000_0001;

/// CPU registers and status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    /// Accumulator register
    pub a: u8,
    /// X index register
    pub x: u8,
    /// Y index register
    pub y: u8,
    /// Program counter (address of the next opcode)
    pub pc: u16,
    /// Stack pointer (0x0100 + sp gives full stack address)
    pub sp: u8,
    /// Negative flag (set if bit 7 of result is 1)
    pub flag_n: bool,
    /// Overflow flag (set on signed overflow)
    pub flag_v: bool,
    /// Break flag (set when BRK executes)
    pub flag_b: bool,
    /// Decimal mode flag
    pub flag_d: bool,
    /// Interrupt disable flag
    pub flag_i: bool,
    /// Zero flag (set if result is zero)
    pub flag_z: bool,
    /// Carry flag (set on unsigned overflow, clear on borrow)
    pub flag_c: bool,
}

impl Registers {
    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC), bit 5 always 1.
    pub fn status(&self) -> u8 {
        let mut status = FLAG_UNUSED;

        if self.flag_n {
            status |= FLAG_N;
        }
        if self.flag_v {
            status |= FLAG_V;
        }
        if self.flag_b {
            status |= FLAG_B;
        }
        if self.flag_d {
            status |= FLAG_D;
        }
        if self.flag_i {
            status |= FLAG_I;
        }
        if self.flag_z {
            status |= FLAG_Z;
        }
        if self.flag_c {
            status |= FLAG_C;
        }

        status
    }

    /// Unpacks a status byte into the individual flags.
    pub fn set_status(&mut self, status: u8) {
        self.flag_n = status & FLAG_N != 0;
        self.flag_v = status & FLAG_V != 0;
        self.flag_b = status & FLAG_B != 0;
        self.flag_d = status & FLAG_D != 0;
        self.flag_i = status & FLAG_I != 0;
        self.flag_z = status & FLAG_Z != 0;
        self.flag_c = status & FLAG_C != 0;
    }

    /// Sets Z and N from a result byte.
    pub fn set_zn(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = value & 0x80 != 0;
    }
}
