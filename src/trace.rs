//! Execution trace logger.
//!
//! A small [`log::Log`] backend that writes `file:line - message` records to
//! stderr or appends them to a trace file. Tracing is switched on and off
//! at runtime through the global max level: `trace` while tracing,
//! `warn` otherwise, so warnings always get through.

use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("cannot open trace file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a logger is already installed")]
    AlreadyInstalled,
}

enum Sink {
    Stderr,
    File(LineWriter<File>),
}

pub struct TraceLogger {
    sink: Mutex<Sink>,
}

impl TraceLogger {
    pub fn stderr() -> Self {
        Self {
            sink: Mutex::new(Sink::Stderr),
        }
    }

    /// Appends to `path`, creating it if needed.
    pub fn file(path: &Path) -> Result<Self, TraceError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| TraceError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            sink: Mutex::new(Sink::File(LineWriter::new(file))),
        })
    }
}

impl Log for TraceLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_record(record);
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = match &mut *sink {
                Sink::Stderr => io::stderr().flush(),
                Sink::File(out) => out.flush(),
            };
        }
    }
}

impl TraceLogger {
    fn write_record(&self, record: &Record<'_>) {
        let file = record.file().unwrap_or("?");
        let line = record.line().unwrap_or(0);
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };

        // A failed trace write is not worth stopping the emulator for.
        let _ = match &mut *sink {
            Sink::Stderr => writeln!(io::stderr(), "{file}:{line} - {}", record.args()),
            Sink::File(out) => writeln!(out, "{file}:{line} - {}", record.args()),
        };
    }
}

/// Installs the trace logger for the process.
///
/// Records go to `path` when given, stderr otherwise. Tracing starts on
/// when `enabled` is set.
pub fn init(path: Option<&Path>, enabled: bool) -> Result<(), TraceError> {
    let logger = match path {
        Some(path) => TraceLogger::file(path)?,
        None => TraceLogger::stderr(),
    };

    log::set_logger(Box::leak(Box::new(logger))).map_err(|_| TraceError::AlreadyInstalled)?;
    set_enabled(enabled);
    Ok(())
}

pub fn set_enabled(enabled: bool) {
    log::set_max_level(if enabled {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    });
}

pub fn is_enabled() -> bool {
    log::max_level() >= LevelFilter::Trace
}

/// Flips tracing and returns the new state.
pub fn toggle() -> bool {
    let enabled = !is_enabled();
    set_enabled(enabled);
    enabled
}
