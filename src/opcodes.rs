//! # NMOS 6502 Instruction Set
//!
//! The 151 documented opcodes as registry descriptors. Mnemonics carry the
//! addressing mode as a suffix so every opcode has a unique name:
//!
//! | Suffix | Mode          | Example |
//! |--------|---------------|---------|
//! | (none) | implied, accumulator, or the canonical form | `NOP`, `ASL`, `JMP` |
//! | `I`    | immediate     | `LDAI`  |
//! | `Z`    | zero page     | `LDAZ`  |
//! | `ZX`   | zero page,X   | `LDAZX` |
//! | `ZY`   | zero page,Y   | `LDXZY` |
//! | `A`    | absolute      | `LDAA`  |
//! | `X`    | absolute,X    | `LDAX`  |
//! | `Y`    | absolute,Y    | `LDAY`  |
//! | `IX`   | (zp,X)        | `LDAIX` |
//! | `IY`   | (zp),Y        | `LDAIY` |
//!
//! `JMP`, `JSR` and `BIT` name their absolute forms; `JMPI` is the indirect
//! jump and `BITZ` the zero-page bit test.
//!
//! Cycle counts are base costs. Indexed loads add one cycle when they cross
//! a page; taken branches add one, plus one more across a page.

use crate::addressing::AddressingMode::{self, *};
use crate::instructions::{
    alu, branches, control, flags, inc_dec, load_store, shifts, stack, transfer,
};
use crate::registry::{Handler, InstructionDescriptor, OpcodeRegistry, RegistryBuilder, RegistryError};

const fn op(
    opcode: u8,
    mnemonic: &'static str,
    mode: AddressingMode,
    cycles: u8,
    handler: Handler,
    description: &'static str,
) -> InstructionDescriptor {
    InstructionDescriptor {
        opcode,
        mnemonic,
        length: mode.instruction_len(),
        cycles,
        mode,
        description,
        handler,
    }
}

/// Number of documented NMOS 6502 opcodes.
pub const INSTRUCTION_COUNT: usize = 151;

/// Every documented opcode, grouped by operation.
pub const INSTRUCTION_SET: [InstructionDescriptor; INSTRUCTION_COUNT] = [
    // ADC
    op(0x69, "ADCI", Immediate, 2, alu::adc, "add immediate with carry"),
    op(0x65, "ADCZ", ZeroPage, 3, alu::adc, "add zero page with carry"),
    op(0x75, "ADCZX", ZeroPageX, 4, alu::adc, "add zero page,X with carry"),
    op(0x6D, "ADCA", Absolute, 4, alu::adc, "add absolute with carry"),
    op(0x7D, "ADCX", AbsoluteX, 4, alu::adc, "add absolute,X with carry"),
    op(0x79, "ADCY", AbsoluteY, 4, alu::adc, "add absolute,Y with carry"),
    op(0x61, "ADCIX", IndirectX, 6, alu::adc, "add (zp,X) with carry"),
    op(0x71, "ADCIY", IndirectY, 5, alu::adc, "add (zp),Y with carry"),
    // AND
    op(0x29, "ANDI", Immediate, 2, alu::and, "and immediate"),
    op(0x25, "ANDZ", ZeroPage, 3, alu::and, "and zero page"),
    op(0x35, "ANDZX", ZeroPageX, 4, alu::and, "and zero page,X"),
    op(0x2D, "ANDA", Absolute, 4, alu::and, "and absolute"),
    op(0x3D, "ANDX", AbsoluteX, 4, alu::and, "and absolute,X"),
    op(0x39, "ANDY", AbsoluteY, 4, alu::and, "and absolute,Y"),
    op(0x21, "ANDIX", IndirectX, 6, alu::and, "and (zp,X)"),
    op(0x31, "ANDIY", IndirectY, 5, alu::and, "and (zp),Y"),
    // ASL
    op(0x0A, "ASL", Accumulator, 2, shifts::asl, "shift accumulator left"),
    op(0x06, "ASLZ", ZeroPage, 5, shifts::asl, "shift zero page left"),
    op(0x16, "ASLZX", ZeroPageX, 6, shifts::asl, "shift zero page,X left"),
    op(0x0E, "ASLA", Absolute, 6, shifts::asl, "shift absolute left"),
    op(0x1E, "ASLX", AbsoluteX, 7, shifts::asl, "shift absolute,X left"),
    // Branches
    op(0x90, "BCC", Relative, 2, branches::bcc, "branch on carry clear"),
    op(0xB0, "BCS", Relative, 2, branches::bcs, "branch on carry set"),
    op(0xF0, "BEQ", Relative, 2, branches::beq, "branch on equal"),
    op(0x30, "BMI", Relative, 2, branches::bmi, "branch on minus"),
    op(0xD0, "BNE", Relative, 2, branches::bne, "branch on not equal"),
    op(0x10, "BPL", Relative, 2, branches::bpl, "branch on plus"),
    op(0x50, "BVC", Relative, 2, branches::bvc, "branch on overflow clear"),
    op(0x70, "BVS", Relative, 2, branches::bvs, "branch on overflow set"),
    // BIT
    op(0x24, "BITZ", ZeroPage, 3, alu::bit, "test bits in zero page"),
    op(0x2C, "BIT", Absolute, 4, alu::bit, "test bits in absolute"),
    // BRK
    op(0x00, "BRK", Implicit, 7, control::brk, "force break"),
    // Flag clears
    op(0x18, "CLC", Implicit, 2, flags::clc, "clear carry"),
    op(0xD8, "CLD", Implicit, 2, flags::cld, "clear decimal mode"),
    op(0x58, "CLI", Implicit, 2, flags::cli, "clear interrupt disable"),
    op(0xB8, "CLV", Implicit, 2, flags::clv, "clear overflow"),
    // CMP
    op(0xC9, "CMPI", Immediate, 2, alu::cmp, "compare accumulator with immediate"),
    op(0xC5, "CMPZ", ZeroPage, 3, alu::cmp, "compare accumulator with zero page"),
    op(0xD5, "CMPZX", ZeroPageX, 4, alu::cmp, "compare accumulator with zero page,X"),
    op(0xCD, "CMPA", Absolute, 4, alu::cmp, "compare accumulator with absolute"),
    op(0xDD, "CMPX", AbsoluteX, 4, alu::cmp, "compare accumulator with absolute,X"),
    op(0xD9, "CMPY", AbsoluteY, 4, alu::cmp, "compare accumulator with absolute,Y"),
    op(0xC1, "CMPIX", IndirectX, 6, alu::cmp, "compare accumulator with (zp,X)"),
    op(0xD1, "CMPIY", IndirectY, 5, alu::cmp, "compare accumulator with (zp),Y"),
    // CPX, CPY
    op(0xE0, "CPXI", Immediate, 2, alu::cpx, "compare X with immediate"),
    op(0xE4, "CPXZ", ZeroPage, 3, alu::cpx, "compare X with zero page"),
    op(0xEC, "CPXA", Absolute, 4, alu::cpx, "compare X with absolute"),
    op(0xC0, "CPYI", Immediate, 2, alu::cpy, "compare Y with immediate"),
    op(0xC4, "CPYZ", ZeroPage, 3, alu::cpy, "compare Y with zero page"),
    op(0xCC, "CPYA", Absolute, 4, alu::cpy, "compare Y with absolute"),
    // DEC
    op(0xC6, "DECZ", ZeroPage, 5, inc_dec::dec, "decrement zero page"),
    op(0xD6, "DECZX", ZeroPageX, 6, inc_dec::dec, "decrement zero page,X"),
    op(0xCE, "DECA", Absolute, 6, inc_dec::dec, "decrement absolute"),
    op(0xDE, "DECX", AbsoluteX, 7, inc_dec::dec, "decrement absolute,X"),
    // Register decrement
    op(0xCA, "DEX", Implicit, 2, inc_dec::dex, "decrement X"),
    op(0x88, "DEY", Implicit, 2, inc_dec::dey, "decrement Y"),
    // EOR
    op(0x49, "EORI", Immediate, 2, alu::eor, "exclusive-or immediate"),
    op(0x45, "EORZ", ZeroPage, 3, alu::eor, "exclusive-or zero page"),
    op(0x55, "EORZX", ZeroPageX, 4, alu::eor, "exclusive-or zero page,X"),
    op(0x4D, "EORA", Absolute, 4, alu::eor, "exclusive-or absolute"),
    op(0x5D, "EORX", AbsoluteX, 4, alu::eor, "exclusive-or absolute,X"),
    op(0x59, "EORY", AbsoluteY, 4, alu::eor, "exclusive-or absolute,Y"),
    op(0x41, "EORIX", IndirectX, 6, alu::eor, "exclusive-or (zp,X)"),
    op(0x51, "EORIY", IndirectY, 5, alu::eor, "exclusive-or (zp),Y"),
    // INC
    op(0xE6, "INCZ", ZeroPage, 5, inc_dec::inc, "increment zero page"),
    op(0xF6, "INCZX", ZeroPageX, 6, inc_dec::inc, "increment zero page,X"),
    op(0xEE, "INCA", Absolute, 6, inc_dec::inc, "increment absolute"),
    op(0xFE, "INCX", AbsoluteX, 7, inc_dec::inc, "increment absolute,X"),
    // Register increment
    op(0xE8, "INX", Implicit, 2, inc_dec::inx, "increment X"),
    op(0xC8, "INY", Implicit, 2, inc_dec::iny, "increment Y"),
    // Jumps
    op(0x4C, "JMP", Absolute, 3, control::jmp, "jump absolute"),
    op(0x6C, "JMPI", Indirect, 5, control::jmp, "jump indirect"),
    op(0x20, "JSR", Absolute, 6, control::jsr, "jump to subroutine"),
    // LDA
    op(0xA9, "LDAI", Immediate, 2, load_store::lda, "load accumulator immediate"),
    op(0xA5, "LDAZ", ZeroPage, 3, load_store::lda, "load accumulator from zero page"),
    op(0xB5, "LDAZX", ZeroPageX, 4, load_store::lda, "load accumulator from zero page,X"),
    op(0xAD, "LDAA", Absolute, 4, load_store::lda, "load accumulator from absolute"),
    op(0xBD, "LDAX", AbsoluteX, 4, load_store::lda, "load accumulator from absolute,X"),
    op(0xB9, "LDAY", AbsoluteY, 4, load_store::lda, "load accumulator from absolute,Y"),
    op(0xA1, "LDAIX", IndirectX, 6, load_store::lda, "load accumulator from (zp,X)"),
    op(0xB1, "LDAIY", IndirectY, 5, load_store::lda, "load accumulator from (zp),Y"),
    // LDX
    op(0xA2, "LDXI", Immediate, 2, load_store::ldx, "load X immediate"),
    op(0xA6, "LDXZ", ZeroPage, 3, load_store::ldx, "load X from zero page"),
    op(0xB6, "LDXZY", ZeroPageY, 4, load_store::ldx, "load X from zero page,Y"),
    op(0xAE, "LDXA", Absolute, 4, load_store::ldx, "load X from absolute"),
    op(0xBE, "LDXY", AbsoluteY, 4, load_store::ldx, "load X from absolute,Y"),
    // LDY
    op(0xA0, "LDYI", Immediate, 2, load_store::ldy, "load Y immediate"),
    op(0xA4, "LDYZ", ZeroPage, 3, load_store::ldy, "load Y from zero page"),
    op(0xB4, "LDYZX", ZeroPageX, 4, load_store::ldy, "load Y from zero page,X"),
    op(0xAC, "LDYA", Absolute, 4, load_store::ldy, "load Y from absolute"),
    op(0xBC, "LDYX", AbsoluteX, 4, load_store::ldy, "load Y from absolute,X"),
    // LSR
    op(0x4A, "LSR", Accumulator, 2, shifts::lsr, "shift accumulator right"),
    op(0x46, "LSRZ", ZeroPage, 5, shifts::lsr, "shift zero page right"),
    op(0x56, "LSRZX", ZeroPageX, 6, shifts::lsr, "shift zero page,X right"),
    op(0x4E, "LSRA", Absolute, 6, shifts::lsr, "shift absolute right"),
    op(0x5E, "LSRX", AbsoluteX, 7, shifts::lsr, "shift absolute,X right"),
    // NOP
    op(0xEA, "NOP", Implicit, 2, control::nop, "no operation"),
    // ORA
    op(0x09, "ORAI", Immediate, 2, alu::ora, "or immediate"),
    op(0x05, "ORAZ", ZeroPage, 3, alu::ora, "or zero page"),
    op(0x15, "ORAZX", ZeroPageX, 4, alu::ora, "or zero page,X"),
    op(0x0D, "ORAA", Absolute, 4, alu::ora, "or absolute"),
    op(0x1D, "ORAX", AbsoluteX, 4, alu::ora, "or absolute,X"),
    op(0x19, "ORAY", AbsoluteY, 4, alu::ora, "or absolute,Y"),
    op(0x01, "ORAIX", IndirectX, 6, alu::ora, "or (zp,X)"),
    op(0x11, "ORAIY", IndirectY, 5, alu::ora, "or (zp),Y"),
    // Stack
    op(0x48, "PHA", Implicit, 3, stack::pha, "push accumulator"),
    op(0x08, "PHP", Implicit, 3, stack::php, "push processor status"),
    op(0x68, "PLA", Implicit, 4, stack::pla, "pull accumulator"),
    op(0x28, "PLP", Implicit, 4, stack::plp, "pull processor status"),
    // ROL
    op(0x2A, "ROL", Accumulator, 2, shifts::rol, "rotate accumulator left"),
    op(0x26, "ROLZ", ZeroPage, 5, shifts::rol, "rotate zero page left"),
    op(0x36, "ROLZX", ZeroPageX, 6, shifts::rol, "rotate zero page,X left"),
    op(0x2E, "ROLA", Absolute, 6, shifts::rol, "rotate absolute left"),
    op(0x3E, "ROLX", AbsoluteX, 7, shifts::rol, "rotate absolute,X left"),
    // ROR
    op(0x6A, "ROR", Accumulator, 2, shifts::ror, "rotate accumulator right"),
    op(0x66, "RORZ", ZeroPage, 5, shifts::ror, "rotate zero page right"),
    op(0x76, "RORZX", ZeroPageX, 6, shifts::ror, "rotate zero page,X right"),
    op(0x6E, "RORA", Absolute, 6, shifts::ror, "rotate absolute right"),
    op(0x7E, "RORX", AbsoluteX, 7, shifts::ror, "rotate absolute,X right"),
    // Returns
    op(0x40, "RTI", Implicit, 6, control::rti, "return from interrupt"),
    op(0x60, "RTS", Implicit, 6, control::rts, "return from subroutine"),
    // SBC
    op(0xE9, "SBCI", Immediate, 2, alu::sbc, "subtract immediate with borrow"),
    op(0xE5, "SBCZ", ZeroPage, 3, alu::sbc, "subtract zero page with borrow"),
    op(0xF5, "SBCZX", ZeroPageX, 4, alu::sbc, "subtract zero page,X with borrow"),
    op(0xED, "SBCA", Absolute, 4, alu::sbc, "subtract absolute with borrow"),
    op(0xFD, "SBCX", AbsoluteX, 4, alu::sbc, "subtract absolute,X with borrow"),
    op(0xF9, "SBCY", AbsoluteY, 4, alu::sbc, "subtract absolute,Y with borrow"),
    op(0xE1, "SBCIX", IndirectX, 6, alu::sbc, "subtract (zp,X) with borrow"),
    op(0xF1, "SBCIY", IndirectY, 5, alu::sbc, "subtract (zp),Y with borrow"),
    // Flag sets
    op(0x38, "SEC", Implicit, 2, flags::sec, "set carry"),
    op(0xF8, "SED", Implicit, 2, flags::sed, "set decimal mode"),
    op(0x78, "SEI", Implicit, 2, flags::sei, "set interrupt disable"),
    // STA
    op(0x85, "STAZ", ZeroPage, 3, load_store::sta, "store accumulator in zero page"),
    op(0x95, "STAZX", ZeroPageX, 4, load_store::sta, "store accumulator in zero page,X"),
    op(0x8D, "STAA", Absolute, 4, load_store::sta, "store accumulator in absolute"),
    op(0x9D, "STAX", AbsoluteX, 5, load_store::sta, "store accumulator in absolute,X"),
    op(0x99, "STAY", AbsoluteY, 5, load_store::sta, "store accumulator in absolute,Y"),
    op(0x81, "STAIX", IndirectX, 6, load_store::sta, "store accumulator in (zp,X)"),
    op(0x91, "STAIY", IndirectY, 6, load_store::sta, "store accumulator in (zp),Y"),
    // STX, STY
    op(0x86, "STXZ", ZeroPage, 3, load_store::stx, "store X in zero page"),
    op(0x96, "STXZY", ZeroPageY, 4, load_store::stx, "store X in zero page,Y"),
    op(0x8E, "STXA", Absolute, 4, load_store::stx, "store X in absolute"),
    op(0x84, "STYZ", ZeroPage, 3, load_store::sty, "store Y in zero page"),
    op(0x94, "STYZX", ZeroPageX, 4, load_store::sty, "store Y in zero page,X"),
    op(0x8C, "STYA", Absolute, 4, load_store::sty, "store Y in absolute"),
    // Transfers
    op(0xAA, "TAX", Implicit, 2, transfer::tax, "transfer accumulator to X"),
    op(0xA8, "TAY", Implicit, 2, transfer::tay, "transfer accumulator to Y"),
    op(0xBA, "TSX", Implicit, 2, transfer::tsx, "transfer stack pointer to X"),
    op(0x8A, "TXA", Implicit, 2, transfer::txa, "transfer X to accumulator"),
    op(0x9A, "TXS", Implicit, 2, transfer::txs, "transfer X to stack pointer"),
    op(0x98, "TYA", Implicit, 2, transfer::tya, "transfer Y to accumulator"),
];

/// Registers the full NMOS instruction set into `builder`.
///
/// Fails on the first conflict with a descriptor already in the builder, so
/// callers can layer their own opcodes before or after.
pub fn register_nmos(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    for descriptor in INSTRUCTION_SET {
        builder.register(descriptor)?;
    }
    Ok(())
}

/// Builds a registry holding exactly the NMOS instruction set.
pub fn nmos6502() -> Result<OpcodeRegistry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    register_nmos(&mut builder)?;
    Ok(builder.build())
}
