//! # 6502 Instruction Implementations
//!
//! Handlers are grouped by category. Each one is a plain function taking an
//! execution [`Context`]; the addressing mode comes from the descriptor the
//! dispatcher resolved, so a single `lda` serves all eight LDA opcodes.
//!
//! ## Categories
//!
//! - **alu**: ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT
//! - **branches**: BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS
//! - **shifts**: ASL, LSR, ROL, ROR
//! - **load_store**: LDA, LDX, LDY, STA, STX, STY
//! - **inc_dec**: INC, DEC, INX, INY, DEX, DEY
//! - **control**: JMP, JSR, RTS, RTI, BRK, NOP
//! - **stack**: PHA, PHP, PLA, PLP
//! - **flags**: CLC, SEC, CLI, SEI, CLD, SED, CLV
//! - **transfer**: TAX, TAY, TXA, TYA, TSX, TXS

pub(crate) mod alu;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod shifts;
pub(crate) mod stack;
pub(crate) mod transfer;

use crate::addressing::AddressingMode;
use crate::memory::MemoryBus;
use crate::registers::Registers;
use crate::registry::InstructionDescriptor;

/// Base address of the hardware stack page.
const STACK_PAGE: u16 = 0x0100;

/// What the dispatcher does with the program counter after a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance past the instruction by its descriptor length.
    Next,

    /// The handler redirected control flow; use this address as-is.
    Jump(u16),
}

/// Everything a handler may touch while one instruction executes.
///
/// The program counter in [`registers`](Context::registers) still holds the
/// address of the opcode being executed. Handlers never move it themselves;
/// they return a [`Flow`].
pub struct Context<'a> {
    registers: &'a mut Registers,
    bus: &'a mut dyn MemoryBus,
    descriptor: InstructionDescriptor,
    address: u16,
    operand: [u8; 2],
    extra_cycles: u8,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        registers: &'a mut Registers,
        bus: &'a mut dyn MemoryBus,
        descriptor: InstructionDescriptor,
        address: u16,
        operand: [u8; 2],
    ) -> Self {
        Self {
            registers,
            bus,
            descriptor,
            address,
            operand,
            extra_cycles: 0,
        }
    }

    pub fn registers(&self) -> &Registers {
        self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        self.registers
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bus.write(addr, value);
    }

    /// Descriptor of the executing instruction.
    pub fn descriptor(&self) -> &InstructionDescriptor {
        &self.descriptor
    }

    pub fn mode(&self) -> AddressingMode {
        self.descriptor.mode
    }

    /// Address of the executing opcode.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Address of the instruction that follows this one.
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(self.descriptor.length as u16)
    }

    /// Operand bytes fetched by the dispatcher (`length - 1` of them).
    pub fn operand(&self) -> &[u8] {
        &self.operand[..self.descriptor.operand_len() as usize]
    }

    pub fn operand_byte(&self) -> u8 {
        self.operand[0]
    }

    /// Operand bytes as a little-endian word.
    pub fn operand_word(&self) -> u16 {
        u16::from_le_bytes(self.operand)
    }

    /// Charges additional cycles on top of the descriptor's base cost.
    pub fn penalty(&mut self, cycles: u8) {
        self.extra_cycles = self.extra_cycles.saturating_add(cycles);
    }

    pub(crate) fn extra_cycles(&self) -> u8 {
        self.extra_cycles
    }

    /// Effective address for the current addressing mode.
    ///
    /// For modes without a memory operand this is the byte after the
    /// opcode. Never charges a page-crossing penalty.
    pub fn effective_address(&self) -> u16 {
        self.resolve().0
    }

    /// Reads the operand value, charging the page-crossing penalty that
    /// indexed loads pay on the NMOS 6502.
    pub fn load(&mut self) -> u8 {
        match self.mode() {
            AddressingMode::Immediate => self.operand_byte(),
            AddressingMode::Accumulator => self.registers.a,
            _ => {
                let (addr, page_crossed) = self.resolve();
                if page_crossed {
                    self.penalty(1);
                }
                self.read(addr)
            }
        }
    }

    /// Writes `value` to the effective address.
    pub fn store(&mut self, value: u8) {
        let addr = self.effective_address();
        self.write(addr, value);
    }

    /// Read-modify-write on the accumulator or on memory, depending on the
    /// addressing mode. Returns the value written back.
    pub fn modify(&mut self, op: impl FnOnce(&mut Registers, u8) -> u8) -> u8 {
        if self.mode() == AddressingMode::Accumulator {
            let a = self.registers.a;
            let result = op(&mut *self.registers, a);
            self.registers.a = result;
            result
        } else {
            let addr = self.effective_address();
            let value = self.read(addr);
            let result = op(&mut *self.registers, value);
            self.write(addr, result);
            result
        }
    }

    pub fn push(&mut self, value: u8) {
        let addr = STACK_PAGE | self.registers.sp as u16;
        self.bus.write(addr, value);
        self.registers.sp = self.registers.sp.wrapping_sub(1);
    }

    pub fn pull(&mut self) -> u8 {
        self.registers.sp = self.registers.sp.wrapping_add(1);
        self.bus.read(STACK_PAGE | self.registers.sp as u16)
    }

    /// Pushes high byte first, so the low byte ends at the lower address.
    pub fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(hi);
        self.push(lo);
    }

    pub fn pull_word(&mut self) -> u16 {
        let lo = self.pull();
        let hi = self.pull();
        u16::from_le_bytes([lo, hi])
    }

    fn resolve(&self) -> (u16, bool) {
        let regs = &*self.registers;
        let zp = self.operand_byte();
        let word = self.operand_word();

        match self.mode() {
            AddressingMode::Implicit
            | AddressingMode::Accumulator
            | AddressingMode::Immediate => (self.address.wrapping_add(1), false),
            AddressingMode::ZeroPage => (zp as u16, false),
            AddressingMode::ZeroPageX => (zp.wrapping_add(regs.x) as u16, false),
            AddressingMode::ZeroPageY => (zp.wrapping_add(regs.y) as u16, false),
            AddressingMode::Relative => {
                let base = self.next_address();
                let target = base.wrapping_add_signed(zp as i8 as i16);
                (target, crosses_page(base, target))
            }
            AddressingMode::Absolute => (word, false),
            AddressingMode::AbsoluteX => {
                let addr = word.wrapping_add(regs.x as u16);
                (addr, crosses_page(word, addr))
            }
            AddressingMode::AbsoluteY => {
                let addr = word.wrapping_add(regs.y as u16);
                (addr, crosses_page(word, addr))
            }
            AddressingMode::Indirect => {
                // High byte never leaves the pointer's page.
                let hi_addr = (word & 0xFF00) | (word.wrapping_add(1) & 0x00FF);
                let target = u16::from_le_bytes([self.read(word), self.read(hi_addr)]);
                (target, false)
            }
            AddressingMode::IndirectX => {
                let ptr = zp.wrapping_add(regs.x);
                let target = self.read_zero_page_word(ptr);
                (target, false)
            }
            AddressingMode::IndirectY => {
                let base = self.read_zero_page_word(zp);
                let addr = base.wrapping_add(regs.y as u16);
                (addr, crosses_page(base, addr))
            }
        }
    }

    fn read_zero_page_word(&self, ptr: u8) -> u16 {
        let lo = self.read(ptr as u16);
        let hi = self.read(ptr.wrapping_add(1) as u16);
        u16::from_le_bytes([lo, hi])
    }
}

fn crosses_page(from: u16, to: u16) -> bool {
    from & 0xFF00 != to & 0xFF00
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn stub(_: &mut Context<'_>) -> Flow {
        Flow::Next
    }

    fn descriptor(mode: AddressingMode) -> InstructionDescriptor {
        InstructionDescriptor {
            opcode: 0xFF,
            mnemonic: "TEST",
            length: mode.instruction_len(),
            cycles: 2,
            mode,
            description: "test",
            handler: stub,
        }
    }

    #[test]
    fn test_indirect_x_wraps_in_zero_page() {
        let mut regs = Registers {
            x: 0x01,
            ..Registers::default()
        };
        let mut mem = FlatMemory::new();
        mem.write(0x00FF, 0x34);
        mem.write(0x0000, 0x12);

        let cx = Context::new(
            &mut regs,
            &mut mem,
            descriptor(AddressingMode::IndirectX),
            0x8000,
            [0xFE, 0],
        );
        assert_eq!(cx.effective_address(), 0x1234);
    }

    #[test]
    fn test_indirect_y_page_cross_penalty() {
        let mut regs = Registers {
            y: 0x10,
            ..Registers::default()
        };
        let mut mem = FlatMemory::new();
        mem.write(0x0040, 0xF8);
        mem.write(0x0041, 0x12);
        mem.write(0x1308, 0x99);

        let mut cx = Context::new(
            &mut regs,
            &mut mem,
            descriptor(AddressingMode::IndirectY),
            0x8000,
            [0x40, 0],
        );
        assert_eq!(cx.load(), 0x99);
        assert_eq!(cx.extra_cycles(), 1);
    }

    #[test]
    fn test_indirect_jump_page_bug() {
        let mut regs = Registers::default();
        let mut mem = FlatMemory::new();
        mem.write(0x10FF, 0x34);
        mem.write(0x1000, 0x12);
        mem.write(0x1100, 0x56);

        let cx = Context::new(
            &mut regs,
            &mut mem,
            descriptor(AddressingMode::Indirect),
            0x8000,
            [0xFF, 0x10],
        );
        assert_eq!(cx.effective_address(), 0x1234);
    }

    #[test]
    fn test_stack_push_pull_word() {
        let mut regs = Registers {
            sp: 0xFF,
            ..Registers::default()
        };
        let mut mem = FlatMemory::new();

        let mut cx = Context::new(
            &mut regs,
            &mut mem,
            descriptor(AddressingMode::Implicit),
            0x8000,
            [0, 0],
        );
        cx.push_word(0xBEEF);
        assert_eq!(cx.registers().sp, 0xFD);
        assert_eq!(cx.read(0x01FF), 0xBE);
        assert_eq!(cx.read(0x01FE), 0xEF);
        assert_eq!(cx.pull_word(), 0xBEEF);
        assert_eq!(cx.registers().sp, 0xFF);
    }
}
