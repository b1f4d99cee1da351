//! Emulator configuration.

use log::warn;

/// Default clock rate: 1 MHz.
pub const DEFAULT_CLOCK_RATE_HZ: u32 = 1_000_000;

/// Default load/run address for assembled programs.
pub const DEFAULT_ENTRY: u16 = 0x4000;

/// Settings for an [`Emulator`](crate::Emulator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Emulated clock rate in Hz.
    pub clock_rate_hz: u32,

    /// Address used when no run/debug address is given.
    pub entry: u16,

    /// Sleep to keep the emulated clock rate. Off means run flat out.
    pub throttle: bool,

    /// Give up after this many instructions in one run.
    pub step_limit: Option<u64>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            clock_rate_hz: DEFAULT_CLOCK_RATE_HZ,
            entry: DEFAULT_ENTRY,
            throttle: true,
            step_limit: None,
        }
    }
}

impl EmulatorConfig {
    /// Sets the clock rate. Zero falls back to the default with a warning.
    pub fn with_clock_rate(mut self, rate_hz: u32) -> Self {
        if rate_hz == 0 {
            warn!("clock rate must be positive, using {DEFAULT_CLOCK_RATE_HZ} Hz");
            self.clock_rate_hz = DEFAULT_CLOCK_RATE_HZ;
        } else {
            self.clock_rate_hz = rate_hz;
        }
        self
    }

    pub fn with_entry(mut self, entry: u16) -> Self {
        self.entry = entry;
        self
    }

    pub fn with_throttle(mut self, throttle: bool) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }
}
