//! Tests for opcode registration and custom handlers.
//!
//! Tests cover:
//! - Validation errors from the builder
//! - Lookup by opcode and mnemonic
//! - Dispatching a handler registered alongside the NMOS set
//! - One registry shared by several CPUs

use std::sync::Arc;

use emu6502::{
    opcodes, AddressingMode, Context, ExecutionError, FlatMemory, Flow, InstructionDescriptor,
    MemoryBus, RegistryBuilder, RegistryError, CPU,
};

fn noop(_: &mut Context<'_>) -> Flow {
    Flow::Next
}

/// Adds the operand to both A and X.
fn add_both(cx: &mut Context<'_>) -> Flow {
    let value = cx.operand_byte();
    let regs = cx.registers_mut();
    regs.a = regs.a.wrapping_add(value);
    regs.x = regs.x.wrapping_add(value);
    Flow::Next
}

/// Jumps to the operand address and charges two extra cycles.
fn slow_jump(cx: &mut Context<'_>) -> Flow {
    cx.penalty(2);
    Flow::Jump(cx.operand_word())
}

fn descriptor(
    opcode: u8,
    mnemonic: &'static str,
    mode: AddressingMode,
    length: u8,
) -> InstructionDescriptor {
    InstructionDescriptor {
        opcode,
        mnemonic,
        length,
        cycles: 2,
        mode,
        description: "test instruction",
        handler: noop,
    }
}

fn setup_cpu(registry: Arc<emu6502::OpcodeRegistry>) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory, registry)
}

// ========== Builder Validation ==========

#[test]
fn test_duplicate_opcode_rejected() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(descriptor(0x02, "ONE", AddressingMode::Implicit, 1))
        .unwrap();

    let err = builder
        .register(descriptor(0x02, "TWO", AddressingMode::Implicit, 1))
        .unwrap_err();

    assert_eq!(
        err,
        RegistryError::DuplicateOpcode {
            opcode: 0x02,
            existing: "ONE",
            mnemonic: "TWO"
        }
    );

    // The first registration survives
    let registry = builder.build();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup(0x02).unwrap().mnemonic, "ONE");
}

#[test]
fn test_duplicate_mnemonic_rejected_ignoring_case() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(descriptor(0x02, "HALT", AddressingMode::Implicit, 1))
        .unwrap();

    let err = builder
        .register(descriptor(0x03, "halt", AddressingMode::Implicit, 1))
        .unwrap_err();

    assert_eq!(
        err,
        RegistryError::DuplicateMnemonic {
            mnemonic: "halt",
            existing: 0x02
        }
    );
    assert!(builder.build().get(0x03).is_none());
}

#[test]
fn test_invalid_length_rejected() {
    let mut builder = RegistryBuilder::new();

    for length in [0u8, 4] {
        let err = builder
            .register(descriptor(0x02, "BAD", AddressingMode::Implicit, length))
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidLength { opcode: 0x02, length });
    }
}

#[test]
fn test_length_must_match_mode() {
    let mut builder = RegistryBuilder::new();

    let err = builder
        .register(descriptor(0x02, "BAD", AddressingMode::Absolute, 2))
        .unwrap_err();

    assert_eq!(
        err,
        RegistryError::LengthMismatch {
            opcode: 0x02,
            length: 2,
            mode: AddressingMode::Absolute,
            expected: 3
        }
    );
}

// ========== Lookup ==========

#[test]
fn test_lookup_nmos_descriptors() {
    let registry = opcodes::nmos6502().unwrap();

    let sta = registry.lookup(0x9D).unwrap();
    assert_eq!(sta.mnemonic, "STAX");
    assert_eq!(sta.mode, AddressingMode::AbsoluteX);
    assert_eq!(sta.length, 3);
    assert_eq!(sta.cycles, 5);

    let jmpi = registry.find_mnemonic("jmpi").unwrap();
    assert_eq!(jmpi.opcode, 0x6C);
    assert_eq!(jmpi.mode, AddressingMode::Indirect);

    assert!(registry.find_mnemonic("LDA").is_none());
    assert_eq!(registry.len(), opcodes::INSTRUCTION_COUNT);
}

#[test]
fn test_iter_in_opcode_order() {
    let registry = opcodes::nmos6502().unwrap();
    let opcodes: Vec<u8> = registry.iter().map(|d| d.opcode).collect();

    assert_eq!(opcodes.len(), registry.len());
    assert!(opcodes.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(opcodes[0], 0x00);
}

#[test]
fn test_lookup_returns_own_opcode_for_every_byte() {
    let registry = opcodes::nmos6502().unwrap();
    let mut registered = 0;

    for op in 0..=255u8 {
        let found = registry.lookup(op).map(|d| d.opcode);
        if registry.get(op).is_some() {
            assert_eq!(found, Ok(op), "opcode 0x{op:02X}");
            registered += 1;
        } else {
            assert_eq!(found, Err(RegistryError::UnknownOpcode(op)));
        }
    }

    assert_eq!(registered, registry.len());
}

// ========== Custom Handlers ==========

#[test]
fn test_custom_opcode_dispatches() {
    let mut builder = RegistryBuilder::new();
    opcodes::register_nmos(&mut builder).unwrap();
    builder
        .register(InstructionDescriptor {
            opcode: 0x02,
            mnemonic: "ADDAX",
            length: 2,
            cycles: 3,
            mode: AddressingMode::Immediate,
            description: "add immediate to A and X",
            handler: add_both,
        })
        .unwrap();

    let mut cpu = setup_cpu(Arc::new(builder.build()));
    cpu.memory_mut().load(0x8000, &[0x02, 0x05, 0xE8]); // ADDAX #5, INX
    cpu.set_a(0x10);
    cpu.set_x(0x20);

    let executed = cpu.step().unwrap();
    assert_eq!(executed.mnemonic, "ADDAX");
    assert_eq!(executed.cycles, 3);
    assert_eq!(cpu.a(), 0x15);
    assert_eq!(cpu.x(), 0x25);
    assert_eq!(cpu.pc(), 0x8002);

    cpu.step().unwrap();
    assert_eq!(cpu.x(), 0x26);
    assert_eq!(cpu.cycles(), 5);
}

#[test]
fn test_custom_jump_with_penalty() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(InstructionDescriptor {
            opcode: 0x42,
            mnemonic: "SJMP",
            length: 3,
            cycles: 3,
            mode: AddressingMode::Absolute,
            description: "slow jump",
            handler: slow_jump,
        })
        .unwrap();

    let mut cpu = setup_cpu(Arc::new(builder.build()));
    cpu.memory_mut().load(0x8000, &[0x42, 0x34, 0x12]);

    let executed = cpu.step().unwrap();
    assert_eq!(executed.cycles, 5);
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_registry_without_nmos_rejects_standard_opcodes() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(descriptor(0x02, "NOP2", AddressingMode::Implicit, 1))
        .unwrap();

    let mut cpu = setup_cpu(Arc::new(builder.build()));
    cpu.memory_mut().load(0x8000, &[0x02, 0xEA]);

    cpu.step().unwrap();
    assert_eq!(
        cpu.step(),
        Err(ExecutionError::IllegalInstruction {
            opcode: 0xEA,
            address: 0x8001
        })
    );
}

#[test]
fn test_registry_shared_between_cpus() {
    let registry = Arc::new(opcodes::nmos6502().unwrap());

    let mut first = setup_cpu(Arc::clone(&registry));
    let mut second = setup_cpu(Arc::clone(&registry));
    assert_eq!(Arc::strong_count(&registry), 3);

    first.memory_mut().load(0x8000, &[0xA9, 0x01]);
    second.memory_mut().load(0x8000, &[0xA9, 0x02]);

    first.step().unwrap();
    second.step().unwrap();

    assert_eq!(first.a(), 0x01);
    assert_eq!(second.a(), 0x02);
    assert!(Arc::ptr_eq(first.registry(), second.registry()));
}
