//! # Emulator Shell
//!
//! Couples a [`CPU`] over [`FlatMemory`] with clock pacing and the
//! program-level operations the command line and the debugger use: loading
//! and saving object images, assembling source into memory, running from an
//! address until BRK, and checking memory contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use crate::assembler::{self, AssemblerError, Program, SymbolTable};
use crate::clock::Ticker;
use crate::config::EmulatorConfig;
use crate::cpu::{Executed, CPU};
use crate::memory::{FlatMemory, ImageError, MemoryBus};
use crate::opcodes;
use crate::registry::{OpcodeRegistry, RegistryError};
use crate::ExecutionError;

#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Assembler(#[from] AssemblerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Assembly source could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured step limit ran out before BRK.
    #[error("no BRK after {limit} instructions")]
    StepLimit { limit: u64 },

    /// A memory assertion did not hold.
    #[error("memory at ${address:04x} is ${actual:02x}, expected ${expected:02x}")]
    Mismatch {
        address: u16,
        expected: u8,
        actual: u8,
    },
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed, the final BRK included.
    pub steps: u64,
    pub cycles: u64,
}

pub struct Emulator {
    cpu: CPU<FlatMemory>,
    ticker: Ticker,
    config: EmulatorConfig,
    symbols: SymbolTable,
}

impl Emulator {
    /// Creates an emulator with zeroed memory, reset to the configured entry.
    pub fn new(registry: Arc<OpcodeRegistry>, config: EmulatorConfig) -> Self {
        let ticker = if config.throttle {
            Ticker::new(config.clock_rate_hz)
        } else {
            Ticker::unthrottled()
        };

        let mut cpu = CPU::new(FlatMemory::new(), registry);
        cpu.reset_to(config.entry);

        Self {
            cpu,
            ticker,
            config,
            symbols: SymbolTable::new(),
        }
    }

    /// Emulator over the documented NMOS instruction set.
    pub fn nmos(config: EmulatorConfig) -> Result<Self, EmulatorError> {
        let registry = Arc::new(opcodes::nmos6502()?);
        Ok(Self::new(registry, config))
    }

    pub fn cpu(&self) -> &CPU<FlatMemory> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<FlatMemory> {
        &mut self.cpu
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &OpcodeRegistry {
        self.cpu.registry()
    }

    /// Labels from the most recent assembly.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Replaces memory with an object image.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), EmulatorError> {
        let path = path.as_ref();
        self.cpu.memory_mut().load_image(path)?;
        debug!("loaded image {}", path.display());
        Ok(())
    }

    /// Writes all of memory as an object image.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EmulatorError> {
        let path = path.as_ref();
        self.cpu.memory().save_image(path)?;
        debug!("saved image {}", path.display());
        Ok(())
    }

    /// Assembles `source` and writes the result into memory.
    pub fn assemble_source(&mut self, source: &str) -> Result<Program, EmulatorError> {
        let program = assembler::assemble(source, self.cpu.registry())?;
        if program.is_empty() {
            warn!("assembly produced no code");
        }

        program.load_into(self.cpu.memory_mut());
        self.symbols = program.symbols.clone();
        debug!(
            "assembled {} bytes, {} labels, ${:04x}-${:04x}",
            program.len(),
            program.symbols.len(),
            program.origin,
            program.end
        );
        Ok(program)
    }

    pub fn assemble_file(&mut self, path: impl AsRef<Path>) -> Result<Program, EmulatorError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| EmulatorError::Source {
            path: path.to_path_buf(),
            source,
        })?;
        self.assemble_source(&source)
    }

    /// Shell reset: PC = `address`, SP = 0xFF, registers and flags cleared.
    pub fn reset(&mut self, address: u16) {
        self.cpu.reset_to(address);
    }

    /// Executes one instruction and paces the clock for it.
    pub fn step(&mut self) -> Result<Executed, EmulatorError> {
        let executed = self.cpu.step()?;
        self.ticker.wait(executed.cycles as u64);
        Ok(executed)
    }

    /// Resets to `address` and runs until BRK sets the break flag.
    pub fn run(&mut self, address: u16) -> Result<RunSummary, EmulatorError> {
        self.reset(address);
        let start_cycles = self.cpu.cycles();
        let mut steps = 0u64;

        while !self.cpu.flag_b() {
            if let Some(limit) = self.config.step_limit {
                if steps >= limit {
                    return Err(EmulatorError::StepLimit { limit });
                }
            }
            self.step()?;
            steps += 1;
        }

        Ok(RunSummary {
            steps,
            cycles: self.cpu.cycles() - start_cycles,
        })
    }

    pub fn inspect(&self, address: u16) -> u8 {
        self.cpu.memory().read(address)
    }

    /// Checks that memory at `address` holds `expected`.
    pub fn assert_memory(&self, address: u16, expected: u8) -> Result<(), EmulatorError> {
        let actual = self.inspect(address);
        if actual == expected {
            Ok(())
        } else {
            Err(EmulatorError::Mismatch {
                address,
                expected,
                actual,
            })
        }
    }
}
