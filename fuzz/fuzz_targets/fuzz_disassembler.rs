//! Fuzz target for the disassembler.
//!
//! Lists arbitrary memory contents and checks that the listing tiles the
//! requested range without gaps.

#![no_main]

use arbitrary::Arbitrary;
use emu6502::{list, opcodes, FlatMemory};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    start_address: u16,
    span: u8,
    bytes: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(registry) = opcodes::nmos6502() else {
        return;
    };

    let mut memory = FlatMemory::new();
    let room = 0x1_0000 - input.start_address as usize;
    let bytes = &input.bytes[..input.bytes.len().min(room)];
    memory.load(input.start_address, bytes);

    let last = input.start_address.saturating_add(input.span as u16);
    let listing = list(&memory, &registry, input.start_address, last);

    let mut expected = input.start_address as u32;
    for decoded in &listing {
        assert_eq!(decoded.address as u32, expected);
        assert!((1..=3).contains(&decoded.length()));
        assert_eq!(decoded.operand().len(), decoded.length() as usize - 1);
        expected += decoded.length() as u32;
    }

    // The last entry starts inside the range.
    if let Some(tail) = listing.last() {
        assert!(tail.address <= last);
    }
});
