//! Fuzz target for the assembler.
//!
//! Feeds arbitrary text to the assembler. Errors are fine, panics are not.
//! Anything that assembles must fit in memory and load cleanly.

#![no_main]

use emu6502::{assemble, opcodes, FlatMemory};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(registry) = opcodes::nmos6502() else {
        return;
    };

    let source = String::from_utf8_lossy(data);
    if let Ok(program) = assemble(&source, &registry) {
        let mut memory = FlatMemory::new();
        program.load_into(&mut memory);

        for (address, byte) in program.bytes() {
            assert_eq!(memory.as_slice()[address as usize], byte);
        }
    }
});
