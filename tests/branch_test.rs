//! Tests for the eight conditional branches.
//!
//! Tests cover:
//! - Taken and not-taken paths for every condition
//! - Forward and backward offsets
//! - The +1 taken and +1 page-cross cycle penalties

use std::sync::Arc;

use emu6502::{opcodes, FlatMemory, MemoryBus, CPU};

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory, Arc::new(opcodes::nmos6502().unwrap()))
}

type FlagSetter = fn(&mut CPU<FlatMemory>, bool);

/// (opcode, mnemonic, flag setter, flag value that takes the branch)
const BRANCHES: [(u8, &str, FlagSetter, bool); 8] = [
    (0x90, "BCC", CPU::<FlatMemory>::set_flag_c, false),
    (0xB0, "BCS", CPU::<FlatMemory>::set_flag_c, true),
    (0xD0, "BNE", CPU::<FlatMemory>::set_flag_z, false),
    (0xF0, "BEQ", CPU::<FlatMemory>::set_flag_z, true),
    (0x10, "BPL", CPU::<FlatMemory>::set_flag_n, false),
    (0x30, "BMI", CPU::<FlatMemory>::set_flag_n, true),
    (0x50, "BVC", CPU::<FlatMemory>::set_flag_v, false),
    (0x70, "BVS", CPU::<FlatMemory>::set_flag_v, true),
];

#[test]
fn test_every_branch_taken() {
    for (opcode, mnemonic, set_flag, taken_when) in BRANCHES {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, 0x05]);
        set_flag(&mut cpu, taken_when);

        let executed = cpu.step().unwrap();

        assert_eq!(executed.mnemonic, mnemonic);
        assert_eq!(cpu.pc(), 0x8007, "{mnemonic} should branch");
        assert_eq!(cpu.cycles(), 3, "{mnemonic} taken costs 3");
    }
}

#[test]
fn test_every_branch_not_taken() {
    for (opcode, mnemonic, set_flag, taken_when) in BRANCHES {
        let mut cpu = setup_cpu();
        cpu.memory_mut().load(0x8000, &[opcode, 0x05]);
        set_flag(&mut cpu, !taken_when);

        cpu.step().unwrap();

        assert_eq!(cpu.pc(), 0x8002, "{mnemonic} should fall through");
        assert_eq!(cpu.cycles(), 2, "{mnemonic} not taken costs 2");
    }
}

#[test]
fn test_branch_backward_within_page() {
    let mut cpu = setup_cpu();
    cpu.set_pc(0x8010);
    // BNE -6
    cpu.memory_mut().load(0x8010, &[0xD0, 0xFA]);
    cpu.set_flag_z(false);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x800C);
    assert_eq!(cpu.cycles(), 3);
}

#[test]
fn test_branch_backward_across_page() {
    let mut cpu = setup_cpu();
    // BNE -4 from $8002 lands on $7FFE
    cpu.memory_mut().load(0x8000, &[0xD0, 0xFC]);
    cpu.set_flag_z(false);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x7FFE);
    assert_eq!(cpu.cycles(), 4);
}

#[test]
fn test_branch_forward_across_page() {
    let mut cpu = setup_cpu();
    cpu.set_pc(0x80F0);
    // BEQ +$20 from $80F2 lands on $8112
    cpu.memory_mut().load(0x80F0, &[0xF0, 0x20]);
    cpu.set_flag_z(true);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x8112);
    assert_eq!(cpu.cycles(), 4);
}

#[test]
fn test_branch_offset_measured_from_next_instruction() {
    let mut cpu = setup_cpu();
    // BCS +0 is a two-byte no-op even when taken
    cpu.memory_mut().load(0x8000, &[0xB0, 0x00]);
    cpu.set_flag_c(true);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x8002);
    assert_eq!(cpu.cycles(), 3);
}

#[test]
fn test_countdown_loop() {
    let mut cpu = setup_cpu();
    // LDXI #3; loop: DEX; BNE loop
    cpu.memory_mut()
        .load(0x8000, &[0xA2, 0x03, 0xCA, 0xD0, 0xFD]);

    // LDX, then three DEX/BNE pairs
    for _ in 0..7 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.x(), 0);
    assert!(cpu.flag_z());
    assert_eq!(cpu.pc(), 0x8005);
    // 2 + 2 * (2 + 3) + (2 + 2)
    assert_eq!(cpu.cycles(), 16);
}
