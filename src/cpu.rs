//! # CPU State and Dispatch
//!
//! The CPU owns its register file and memory bus and shares an immutable
//! [`OpcodeRegistry`] with any other CPU built from the same table.
//!
//! ## Execution Model
//!
//! `step()` runs one instruction:
//! 1. Fetch the opcode at PC
//! 2. Resolve it through the registry (unregistered opcodes fail before any
//!    state changes)
//! 3. Fetch `length - 1` operand bytes
//! 4. Run the handler with an execution [`Context`]
//! 5. Advance PC past the instruction, or take the handler's jump target
//! 6. Charge base cycles plus any penalty the handler reported
//!
//! `run_for_cycles()` repeats `step()` until a cycle budget is spent.

use std::sync::Arc;

use log::trace;

use crate::instructions::{Context, Flow};
use crate::memory::MemoryBus;
use crate::registers::Registers;
use crate::registry::OpcodeRegistry;
use crate::ExecutionError;

/// Reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Where the dispatcher is within the current instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to fetch the next opcode.
    Fetching,

    /// A handler is running. Observed from outside only when a handler
    /// unwound without returning.
    Executing,
}

/// Summary of one dispatched instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
    /// Address the opcode was fetched from.
    pub address: u16,
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub length: u8,
    /// Cycles charged, penalties included.
    pub cycles: u8,
}

/// 6502 CPU generic over its memory bus.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use emu6502::{opcodes, FlatMemory, MemoryBus, CPU};
///
/// let registry = Arc::new(opcodes::nmos6502().unwrap());
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
///
/// let cpu = CPU::new(memory, registry);
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFD);
/// assert!(cpu.flag_i());
/// assert_eq!(cpu.cycles(), 0);
/// ```
pub struct CPU<M: MemoryBus> {
    registers: Registers,
    memory: M,
    registry: Arc<OpcodeRegistry>,
    cycles: u64,
    phase: Phase,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a CPU in the power-on state.
    ///
    /// - PC is loaded from the reset vector at 0xFFFC/0xFFFD (little-endian)
    /// - SP is 0xFD
    /// - Interrupt disable is set, every other flag clear
    /// - A, X, Y and the cycle counter are zero
    pub fn new(memory: M, registry: Arc<OpcodeRegistry>) -> Self {
        let lo = memory.read(RESET_VECTOR);
        let hi = memory.read(RESET_VECTOR.wrapping_add(1));

        let registers = Registers {
            pc: u16::from_le_bytes([lo, hi]),
            sp: 0xFD,
            flag_i: true,
            ..Registers::default()
        };

        Self {
            registers,
            memory,
            registry,
            cycles: 0,
            phase: Phase::Fetching,
        }
    }

    /// Starts over at `address`: SP = 0xFF, A/X/Y and every flag cleared.
    ///
    /// The cycle counter keeps running and memory is untouched. Clears a
    /// poisoned phase.
    pub fn reset_to(&mut self, address: u16) {
        self.registers = Registers {
            pc: address,
            sp: 0xFF,
            ..Registers::default()
        };
        self.phase = Phase::Fetching;
    }

    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::IllegalInstruction`] if the opcode at PC has no
    ///   descriptor. Registers, memory and cycles are left unchanged.
    /// - [`ExecutionError::Poisoned`] if an earlier step unwound out of a
    ///   handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use emu6502::{opcodes, ExecutionError, FlatMemory, MemoryBus, CPU};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFD, 0x10);
    /// mem.load(0x1000, &[0xA9, 0x42, 0x02]); // LDAI $42, then an illegal opcode
    ///
    /// let mut cpu = CPU::new(mem, Arc::new(opcodes::nmos6502().unwrap()));
    ///
    /// let executed = cpu.step().unwrap();
    /// assert_eq!(executed.mnemonic, "LDAI");
    /// assert_eq!(cpu.pc(), 0x1002);
    ///
    /// assert_eq!(
    ///     cpu.step(),
    ///     Err(ExecutionError::IllegalInstruction { opcode: 0x02, address: 0x1002 })
    /// );
    /// assert_eq!(cpu.pc(), 0x1002);
    /// ```
    pub fn step(&mut self) -> Result<Executed, ExecutionError> {
        let address = self.registers.pc;

        if self.phase == Phase::Executing {
            return Err(ExecutionError::Poisoned { address });
        }

        let opcode = self.memory.read(address);
        let descriptor = *self
            .registry
            .get(opcode)
            .ok_or(ExecutionError::IllegalInstruction { opcode, address })?;

        let mut operand = [0u8; 2];
        for (offset, byte) in operand
            .iter_mut()
            .take(descriptor.operand_len() as usize)
            .enumerate()
        {
            *byte = self.memory.read(address.wrapping_add(1 + offset as u16));
        }

        self.phase = Phase::Executing;

        let mut cx = Context::new(
            &mut self.registers,
            &mut self.memory,
            descriptor,
            address,
            operand,
        );
        let flow = (descriptor.handler)(&mut cx);
        let cycles = descriptor.cycles.saturating_add(cx.extra_cycles());

        self.registers.pc = match flow {
            Flow::Next => address.wrapping_add(descriptor.length as u16),
            Flow::Jump(target) => target,
        };
        self.cycles += cycles as u64;
        self.phase = Phase::Fetching;

        let r = &self.registers;
        trace!(
            "{:04X}  {:02X} {:<6} A={:02X} X={:02X} Y={:02X} SP={:02X} P={:02X} CYC={}",
            address,
            opcode,
            descriptor.mnemonic,
            r.a,
            r.x,
            r.y,
            r.sp,
            r.status(),
            self.cycles
        );

        Ok(Executed {
            address,
            opcode,
            mnemonic: descriptor.mnemonic,
            length: descriptor.length,
            cycles,
        })
    }

    /// Runs until at least `cycle_budget` cycles have been spent.
    ///
    /// Returns the cycles actually consumed, which may overshoot the budget
    /// by part of one instruction.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, ExecutionError> {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles.saturating_add(cycle_budget);

        while self.cycles < target_cycles {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn registry(&self) -> &Arc<OpcodeRegistry> {
        &self.registry
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Gives the memory bus back, dropping the CPU.
    pub fn into_memory(self) -> M {
        self.memory
    }

    // ========== Register Getters ==========

    pub fn a(&self) -> u8 {
        self.registers.a
    }

    pub fn x(&self) -> u8 {
        self.registers.x
    }

    pub fn y(&self) -> u8 {
        self.registers.y
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn sp(&self) -> u8 {
        self.registers.sp
    }

    /// Packed status byte (NV1BDIZC).
    pub fn status(&self) -> u8 {
        self.registers.status()
    }

    /// Total cycles executed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn flag_n(&self) -> bool {
        self.registers.flag_n
    }

    pub fn flag_v(&self) -> bool {
        self.registers.flag_v
    }

    pub fn flag_b(&self) -> bool {
        self.registers.flag_b
    }

    pub fn flag_d(&self) -> bool {
        self.registers.flag_d
    }

    pub fn flag_i(&self) -> bool {
        self.registers.flag_i
    }

    pub fn flag_z(&self) -> bool {
        self.registers.flag_z
    }

    pub fn flag_c(&self) -> bool {
        self.registers.flag_c
    }

    // ========== Register Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.registers.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.registers.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.registers.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.registers.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.registers.sp = value;
    }

    pub fn set_status(&mut self, value: u8) {
        self.registers.set_status(value);
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.registers.flag_n = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.registers.flag_v = value;
    }

    pub fn set_flag_b(&mut self, value: bool) {
        self.registers.flag_b = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.registers.flag_d = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.registers.flag_i = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.registers.flag_z = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.registers.flag_c = value;
    }
}
