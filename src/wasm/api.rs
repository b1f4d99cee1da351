//! WASM API for the 6502 emulator.
//!
//! Wraps an unthrottled [`Emulator`] for JavaScript callers: assemble,
//! load, step, run until BRK, and read back registers, memory and listings.

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;

use crate::{disassembler, Emulator, EmulatorConfig, EmulatorError, MemoryBus};

/// Instruction budget for `run_until_break` so a runaway program cannot hang
/// the page.
const RUN_STEP_LIMIT: u64 = 10_000_000;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<EmulatorError> for JsError {
    fn from(err: EmulatorError) -> Self {
        JsError {
            message: err.to_string(),
        }
    }
}

/// Result of assembly operation
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    success: bool,
    origin: u16,
    end: u16,
    size: usize,
    error_message: Option<String>,
    error_line: Option<usize>,
}

#[wasm_bindgen]
impl AssemblyResult {
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.success
    }

    #[wasm_bindgen(getter)]
    pub fn origin(&self) -> u16 {
        self.origin
    }

    #[wasm_bindgen(getter)]
    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of bytes emitted.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[wasm_bindgen(getter)]
    pub fn error_message(&self) -> Option<String> {
        self.error_message.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn error_line(&self) -> Option<usize> {
        self.error_line
    }
}

/// One line of a listing.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u16,
    mnemonic: String,
    assembly: String,
    text: String,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Registry mnemonic, e.g. `LDAI`.
    #[wasm_bindgen(getter)]
    pub fn mnemonic(&self) -> String {
        self.mnemonic.clone()
    }

    /// Conventional syntax, e.g. `LDA #$42`.
    #[wasm_bindgen(getter)]
    pub fn assembly(&self) -> String {
        self.assembly.clone()
    }

    /// Listing text, e.g. `PC=0600 LDAI 42`.
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct Emulator6502 {
    emu: Emulator,
}

#[wasm_bindgen]
impl Emulator6502 {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Emulator6502, JsError> {
        let config = EmulatorConfig::default()
            .with_throttle(false)
            .with_step_limit(Some(RUN_STEP_LIMIT));
        Ok(Emulator6502 {
            emu: Emulator::nmos(config)?,
        })
    }

    /// Execute a single instruction
    pub fn step(&mut self) -> Result<(), JsError> {
        self.emu.step()?;
        Ok(())
    }

    /// Reset to `address` and run until BRK. Returns the cycles spent.
    pub fn run_until_break(&mut self, address: u16) -> Result<f64, JsError> {
        let summary = self.emu.run(address)?;
        Ok(summary.cycles as f64)
    }

    /// Shell reset: PC = `address`, SP = 0xFF, registers and flags cleared.
    pub fn reset(&mut self, address: u16) {
        self.emu.reset(address);
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.emu.cpu().a()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        self.emu.cpu().x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        self.emu.cpu().y()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.emu.cpu().pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        self.emu.cpu().sp()
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        self.emu.cpu().status()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.emu.cpu().cycles() as f64 // u64 does not cross the boundary
    }

    pub fn set_pc(&mut self, addr: u16) {
        self.emu.cpu_mut().set_pc(addr);
    }

    pub fn read_memory(&self, addr: u16) -> u8 {
        self.emu.inspect(addr)
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.emu.cpu_mut().memory_mut().write(addr, value);
    }

    /// Read a 256-byte page from memory (for efficient display)
    pub fn get_memory_page(&self, page: u8) -> Uint8Array {
        let start = (page as u16) << 8;
        let bytes: Vec<u8> = (0..256u16).map(|i| self.emu.inspect(start + i)).collect();
        Uint8Array::from(&bytes[..])
    }

    /// Assemble source into memory. Errors are reported in the result.
    pub fn assemble(&mut self, source: String) -> AssemblyResult {
        match self.emu.assemble_source(&source) {
            Ok(program) => AssemblyResult {
                success: true,
                origin: program.origin,
                end: program.end,
                size: program.len(),
                error_message: None,
                error_line: None,
            },
            Err(err) => {
                let error_line = match &err {
                    EmulatorError::Assembler(asm) => Some(asm.line),
                    _ => None,
                };
                AssemblyResult {
                    success: false,
                    origin: 0,
                    end: 0,
                    size: 0,
                    error_message: Some(err.to_string()),
                    error_line,
                }
            }
        }
    }

    /// Disassemble `count` instructions starting at `start_addr`.
    pub fn disassemble(&self, start_addr: u16, count: u32) -> Vec<JsValue> {
        let cpu = self.emu.cpu();
        let mut address = start_addr;
        let mut lines = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let decoded = disassembler::decode_at(cpu.memory(), cpu.registry(), address);
            address = decoded.next_address();
            lines.push(JsValue::from(DisassemblyLine {
                address: decoded.address,
                mnemonic: decoded.mnemonic().to_string(),
                assembly: decoded.assembly(),
                text: decoded.to_string(),
            }));
        }

        lines
    }
}
