//! `emu6502` command-line front end.
//!
//! Loads or assembles a program, then runs or debugs it, checks memory
//! assertions and prints the requested dumps.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn};

use emu6502::config::DEFAULT_CLOCK_RATE_HZ;
use emu6502::debugger::Debugger;
use emu6502::{dump, trace, Emulator, EmulatorConfig};

const AFTER_HELP: &str = "\
Addresses and values are hex, with or without a leading $.
-c wins over -l, and -r wins over -d.
-p takes any of r (registers), f (flags), s (stack), m (memory); bare -p means rfm.";

#[derive(Parser, Debug)]
#[command(
    name = "emu6502",
    version,
    about = "Table-driven NMOS 6502 emulator with assembler and debugger",
    after_help = AFTER_HELP,
    disable_version_flag = true
)]
struct Cli {
    /// Load an object image (64 KiB) into memory.
    #[arg(short = 'l', long = "load", value_name = "FILE")]
    load: Option<PathBuf>,

    /// Assemble a source file into memory.
    #[arg(short = 'c', long = "assemble", value_name = "FILE")]
    assemble: Option<PathBuf>,

    /// Save memory as an object image after assembling.
    #[arg(short = 's', long = "save", value_name = "FILE")]
    save: Option<PathBuf>,

    /// Run from ADDR until BRK.
    #[arg(short = 'r', long = "run", value_name = "ADDR", value_parser = parse_address)]
    run: Option<u16>,

    /// Start the interactive debugger at ADDR.
    #[arg(short = 'd', long = "debug", value_name = "ADDR", value_parser = parse_address)]
    debug: Option<u16>,

    /// Check that memory at ADDR holds VAL (repeatable).
    #[arg(short = 'a', long = "assert", value_name = "ADDR:VAL", value_parser = parse_assertion, action = ArgAction::Append)]
    asserts: Vec<(u16, u8)>,

    /// Trace every executed instruction.
    #[arg(short = 't', long = "trace")]
    trace: bool,

    /// Write trace output to FILE instead of stderr.
    #[arg(long = "trace-file", value_name = "FILE")]
    trace_file: Option<PathBuf>,

    /// List the instruction set.
    #[arg(short = 'i', long = "instructions")]
    instructions: bool,

    /// Dump machine state on exit.
    #[arg(short = 'p', long = "print", value_name = "rfsm", num_args = 0..=1, default_missing_value = "rfm")]
    print: Option<String>,

    /// Emulated clock rate in Hz.
    #[arg(long = "rate", value_name = "HZ", default_value_t = DEFAULT_CLOCK_RATE_HZ)]
    rate: u32,

    /// Run flat out instead of pacing to the clock rate.
    #[arg(long = "no-throttle")]
    no_throttle: bool,

    /// Give up after N instructions.
    #[arg(long = "step-limit", value_name = "N")]
    step_limit: Option<u64>,

    /// Print version information.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

fn parse_address(text: &str) -> Result<u16, String> {
    let digits = text.strip_prefix('$').unwrap_or(text);
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("'{text}' is not a 16-bit hex address"));
    }
    u16::from_str_radix(digits, 16).map_err(|e| e.to_string())
}

fn parse_assertion(text: &str) -> Result<(u16, u8), String> {
    let (address, value) = text
        .split_once(':')
        .ok_or_else(|| format!("'{text}' is not ADDR:VAL"))?;
    let address = parse_address(address)?;
    let value = parse_address(value)?;
    let value = u8::try_from(value).map_err(|_| format!("'{text}': value does not fit a byte"))?;
    Ok((address, value))
}

/// Which dumps `-p` asked for.
#[derive(Debug, Default, Clone, Copy)]
struct Dumps {
    registers: bool,
    flags: bool,
    stack: bool,
    memory: bool,
}

impl Dumps {
    fn parse(spec: &str) -> Result<Self> {
        let mut dumps = Dumps::default();
        for c in spec.chars() {
            match c.to_ascii_lowercase() {
                'r' => dumps.registers = true,
                'f' => dumps.flags = true,
                's' => dumps.stack = true,
                'm' => dumps.memory = true,
                other => bail!("unknown -p selector '{other}', expected r, f, s or m"),
            }
        }
        Ok(dumps)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    trace::init(cli.trace_file.as_deref(), cli.trace).context("failed to set up tracing")?;

    let dumps = cli.print.as_deref().map(Dumps::parse).transpose()?;

    let config = EmulatorConfig::default()
        .with_clock_rate(cli.rate)
        .with_throttle(!cli.no_throttle)
        .with_step_limit(cli.step_limit);
    let entry = config.entry;
    let mut emu = Emulator::nmos(config).context("failed to build the instruction set")?;

    if cli.instructions {
        print!("{}", dump::instructions(emu.registry()));
    }

    if let Some(source) = &cli.assemble {
        if cli.load.is_some() {
            warn!("-c overrides -l, not loading the image");
        }
        let program = emu
            .assemble_file(source)
            .with_context(|| format!("failed to assemble {}", source.display()))?;
        info!(
            "assembled {} bytes at ${:04x}-${:04x}",
            program.len(),
            program.origin,
            program.end
        );

        if let Some(image) = &cli.save {
            emu.save(image)
                .with_context(|| format!("failed to save {}", image.display()))?;
        }
    } else {
        if let Some(image) = &cli.load {
            emu.load(image)
                .with_context(|| format!("failed to load {}", image.display()))?;
        }
        if cli.save.is_some() {
            warn!("-s only applies after -c, nothing saved");
        }
    }

    match (cli.run, cli.debug) {
        (Some(address), debug) => {
            if debug.is_some() {
                warn!("-r overrides -d, running without the debugger");
            }
            let summary = emu
                .run(address)
                .with_context(|| format!("run from ${address:04x} failed"))?;
            info!("{} instructions, {} cycles", summary.steps, summary.cycles);
        }
        (None, Some(address)) => {
            let stdin = io::stdin();
            Debugger::session(&mut emu, address, stdin.lock(), io::stdout().lock())
                .context("debugger session failed")?;
        }
        (None, None) => {
            if !cli.asserts.is_empty() || dumps.is_some() {
                info!("nothing to run, checking memory as loaded (entry ${entry:04x})");
            }
        }
    }

    let mut status = ExitCode::SUCCESS;
    for &(address, value) in &cli.asserts {
        if let Err(err) = emu.assert_memory(address, value) {
            eprintln!("assertion failed: {err}");
            status = ExitCode::FAILURE;
        }
    }

    if let Some(dumps) = dumps {
        let cpu = emu.cpu();
        if dumps.registers {
            println!("{}", dump::registers(cpu.registers()));
        }
        if dumps.flags {
            println!("{}", dump::flags(cpu.registers()));
        }
        if dumps.stack {
            println!("{}", dump::stack(cpu.registers(), cpu.memory()));
        }
        if dumps.memory {
            let pc = cpu.pc();
            print!("{}", dump::memory(cpu.memory(), pc, pc.saturating_add(0x3F)));
        }
    }

    Ok(status)
}
