//! Fuzz target for CPU step execution.
//!
//! Builds an arbitrary CPU state and memory contents, then dispatches one
//! instruction. Illegal opcodes must leave the CPU untouched; legal ones
//! must advance the cycle counter by at least the base cycle count.

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use emu6502::{opcodes, ExecutionError, FlatMemory, MemoryBus, Phase, CPU};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
}

/// Memory region for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location (instruction + operands)
    instruction_bytes: [u8; 3],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    /// Placed at 0x4000 for absolute addressing
    main_memory: [u8; 256],
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(registry) = opcodes::nmos6502() else {
        return;
    };

    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);

    memory.load(0x0000, &input.memory.zero_page);
    memory.load(0x0100, &input.memory.stack_page);
    memory.load(0x4000, &input.memory.main_memory);
    memory.load(0x8000, &input.memory.instruction_bytes);

    let mut cpu = CPU::new(memory, Arc::new(registry));
    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(input.cpu_state.status);

    let before = *cpu.registers();
    let opcode = input.memory.instruction_bytes[0];

    match cpu.step() {
        Ok(executed) => {
            let base = cpu.registry().lookup(opcode).map(|d| d.cycles).unwrap_or(0);
            assert_eq!(executed.opcode, opcode);
            assert!(executed.cycles >= base);
            assert_eq!(cpu.cycles(), executed.cycles as u64);
        }
        Err(ExecutionError::IllegalInstruction { address, .. }) => {
            assert_eq!(address, 0x8000);
            assert_eq!(*cpu.registers(), before);
            assert_eq!(cpu.cycles(), 0);
        }
        Err(err) => panic!("unexpected error: {err}"),
    }

    assert_eq!(cpu.phase(), Phase::Fetching);
});
