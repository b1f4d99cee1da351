//! # Interactive Debugger
//!
//! A line-oriented command loop over an [`Emulator`]. Commands accept their
//! full name or a one-letter abbreviation; addresses and values are hex,
//! with or without a leading `$`.
//!
//! | Command              | Abbrev | Effect |
//! |----------------------|--------|--------|
//! | `exit`, `quit`       | `x`, `q` | leave the debugger |
//! | `print [first] [last]` | `p`  | hex dump (defaults to PC) |
//! | `flags`              | `f`    | flag dump |
//! | `registers`          | `e`    | register dump |
//! | `stack`              | `a`    | stack dump |
//! | `step`               | `s`    | execute one instruction |
//! | `break [addr]`       | `b`    | set a breakpoint, or list them |
//! | `clear addr`         | `c`    | remove a breakpoint |
//! | `go`                 | `g`    | run from PC until a breakpoint or BRK |
//! | `run [addr]`         | `r`    | reset to addr (default: entry) and run |
//! | `trace`              | `t`    | toggle execution tracing |
//! | `list [first] [last]`| `l`    | disassemble (defaults to PC) |
//! | `assert addr value`  |        | compare memory, print true/false |
//! | `help`               | `h`    | command summary |

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use log::debug;
use thiserror::Error;

use crate::disassembler;
use crate::dump;
use crate::emulator::Emulator;
use crate::trace;

pub const PROMPT: &str = "> ";

const HELP: &str = "\
Valid commands:
\trun (or r) [address]
\tstep (or s)
\tgo (or g)
\tprint (or p) [first] [last]
\tregisters (or e)
\tflags (or f)
\tstack (or a)
\tbreak (or b) [address]
\tclear (or c) address
\ttrace (or t)
\tlist (or l) [first] [last]
\tassert address value
\texit (or x)
\tquit (or q)
\thelp (or h)
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Print { first: Option<u16>, last: Option<u16> },
    Flags,
    Registers,
    Stack,
    Step,
    Break(Option<u16>),
    Clear(u16),
    Go,
    Run(Option<u16>),
    Trace,
    List { first: Option<u16>, last: Option<u16> },
    Assert { address: u16, value: u8 },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command} needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("not a hex value: {0}")]
    InvalidNumber(String),
}

impl Command {
    /// Parses one debugger line. Extra arguments are ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_uppercase();
        let first = words.next();
        let second = words.next();

        let command = match name.as_str() {
            "EXIT" | "X" | "QUIT" | "Q" => Command::Exit,
            "PRINT" | "P" => Command::Print {
                first: optional(first)?,
                last: optional(second)?,
            },
            "FLAGS" | "F" => Command::Flags,
            "REGISTERS" | "E" => Command::Registers,
            "STACK" | "A" => Command::Stack,
            "STEP" | "S" => Command::Step,
            "BREAK" | "B" => Command::Break(optional(first)?),
            "CLEAR" | "C" => Command::Clear(required(first, "clear", "an address")?),
            "GO" | "G" => Command::Go,
            "RUN" | "R" => Command::Run(optional(first)?),
            "TRACE" | "T" => Command::Trace,
            "LIST" | "L" => Command::List {
                first: optional(first)?,
                last: optional(second)?,
            },
            "ASSERT" => {
                let address = required(first, "assert", "an address")?;
                let value = required(second, "assert", "a value")?;
                let value = u8::try_from(value)
                    .map_err(|_| CommandError::InvalidNumber(second.unwrap_or_default().to_string()))?;
                Command::Assert { address, value }
            }
            "HELP" | "H" => Command::Help,
            _ => return Err(CommandError::Unknown(name)),
        };

        Ok(command)
    }
}

fn parse_hex(word: &str) -> Result<u16, CommandError> {
    let digits = word.strip_prefix('$').unwrap_or(word);
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CommandError::InvalidNumber(word.to_string()));
    }
    u16::from_str_radix(digits, 16).map_err(|_| CommandError::InvalidNumber(word.to_string()))
}

fn optional(word: Option<&str>) -> Result<Option<u16>, CommandError> {
    word.map(parse_hex).transpose()
}

fn required(
    word: Option<&str>,
    command: &'static str,
    argument: &'static str,
) -> Result<u16, CommandError> {
    word.map(parse_hex)
        .transpose()?
        .ok_or(CommandError::MissingArgument { command, argument })
}

#[derive(Debug, Error)]
pub enum DebugError {
    #[error("debugger i/o: {0}")]
    Io(#[from] io::Error),
}

/// What the session loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Prompt,
    Resume,
    Exit,
}

pub struct Debugger<'e> {
    emu: &'e mut Emulator,
    entry: u16,
    breakpoints: BTreeSet<u16>,
}

impl<'e> Debugger<'e> {
    /// Attaches to `emu` and resets it to `entry`.
    pub fn new(emu: &'e mut Emulator, entry: u16) -> Self {
        emu.reset(entry);
        Self {
            emu,
            entry,
            breakpoints: BTreeSet::new(),
        }
    }

    /// Runs a full session: prompt, read, execute, until exit, end of input
    /// or BRK.
    pub fn session<R: BufRead, W: Write>(
        emu: &'e mut Emulator,
        address: u16,
        input: R,
        output: W,
    ) -> Result<(), DebugError> {
        Debugger::new(emu, address).run(input, output)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u16> + '_ {
        self.breakpoints.iter().copied()
    }

    pub fn emulator(&self) -> &Emulator {
        &*self.emu
    }

    /// Drives the command loop over `input`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), DebugError> {
        let mut lines = input.lines();
        let mut running = false;
        let mut free_steps = 0u64;

        while !self.emu.cpu().flag_b() {
            if running {
                running = self.free_run_step(&mut output, &mut free_steps)?;
                continue;
            }

            write!(output, "{PROMPT}")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            debug!("debugger command: {}", line.trim());

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(err) => {
                    writeln!(output, "{err}")?;
                    continue;
                }
            };

            match self.execute(command, &mut output)? {
                Control::Prompt => {}
                Control::Resume => {
                    running = true;
                    free_steps = 0;
                }
                Control::Exit => return Ok(()),
            }
        }

        Ok(())
    }

    fn free_run_step<W: Write>(&mut self, output: &mut W, steps: &mut u64) -> Result<bool, DebugError> {
        if let Some(limit) = self.emu.config().step_limit {
            if *steps >= limit {
                writeln!(output, "stopped after {limit} instructions")?;
                return Ok(false);
            }
        }

        if let Err(err) = self.emu.step() {
            writeln!(output, "error: {err}")?;
            return Ok(false);
        }
        *steps += 1;

        let pc = self.emu.cpu().pc();
        if self.breakpoints.contains(&pc) {
            writeln!(output, "break at {pc:04x}")?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Executes one command, writing any text it produces to `output`.
    pub fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> Result<Control, DebugError> {
        let pc = self.emu.cpu().pc();

        match command {
            Command::Exit => return Ok(Control::Exit),
            Command::Print { first, last } => {
                let first = first.unwrap_or(pc);
                let last = last.unwrap_or(first);
                write!(output, "{}", dump::memory(self.emu.cpu().memory(), first, last))?;
            }
            Command::Flags => writeln!(output, "{}", dump::flags(self.emu.cpu().registers()))?,
            Command::Registers => {
                writeln!(output, "{}", dump::registers(self.emu.cpu().registers()))?
            }
            Command::Stack => {
                let cpu = self.emu.cpu();
                writeln!(output, "{}", dump::stack(cpu.registers(), cpu.memory()))?
            }
            Command::Step => {
                let decoded = disassembler::decode_at(self.emu.cpu().memory(), self.emu.registry(), pc);
                writeln!(output, "{decoded}")?;
                if let Err(err) = self.emu.step() {
                    writeln!(output, "error: {err}")?;
                }
            }
            Command::Break(Some(address)) => {
                self.breakpoints.insert(address);
            }
            Command::Break(None) => {
                for address in &self.breakpoints {
                    writeln!(output, "{address:04x}")?;
                }
            }
            Command::Clear(address) => {
                if !self.breakpoints.remove(&address) {
                    writeln!(output, "no breakpoint at {address:04x}")?;
                }
            }
            Command::Go => return Ok(Control::Resume),
            Command::Run(address) => {
                self.emu.reset(address.unwrap_or(self.entry));
                return Ok(Control::Resume);
            }
            Command::Trace => {
                let enabled = trace::toggle();
                writeln!(output, "trace {}", if enabled { "on" } else { "off" })?;
            }
            Command::List { first, last } => {
                let first = first.unwrap_or(pc);
                let last = last.unwrap_or(first);
                let cpu = self.emu.cpu();
                for decoded in disassembler::list(cpu.memory(), cpu.registry(), first, last) {
                    writeln!(output, "{decoded}")?;
                }
            }
            Command::Assert { address, value } => {
                let holds = self.emu.assert_memory(address, value).is_ok();
                writeln!(output, "{holds}")?;
            }
            Command::Help => write!(output, "{HELP}")?,
        }

        Ok(Control::Prompt)
    }
}
