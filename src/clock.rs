//! Clock pacing.
//!
//! A [`Ticker`] keeps emulated time close to wall-clock time at a fixed
//! clock rate. Cycles are converted to nanoseconds and accumulated; the
//! ticker only sleeps once at least [`MIN_SLEEP`] is owed, so sub-
//! millisecond instructions do not each pay the cost of a syscall.

use std::thread;
use std::time::{Duration, Instant};

/// Smallest debt worth sleeping for.
pub const MIN_SLEEP: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct Ticker {
    /// Nanoseconds per cycle, `None` when unthrottled.
    cycle_nanos: Option<u64>,
    owed: Duration,
    last_sleep: Option<Instant>,
}

impl Ticker {
    /// Paces to `rate_hz` cycles per second. A zero rate never sleeps.
    pub fn new(rate_hz: u32) -> Self {
        let cycle_nanos = (rate_hz > 0).then(|| 1_000_000_000 / rate_hz as u64);
        Self {
            cycle_nanos,
            owed: Duration::ZERO,
            last_sleep: None,
        }
    }

    /// A ticker that never sleeps.
    pub fn unthrottled() -> Self {
        Self::new(0)
    }

    pub fn is_throttled(&self) -> bool {
        self.cycle_nanos.is_some()
    }

    /// Time not yet slept off.
    pub fn owed(&self) -> Duration {
        self.owed
    }

    /// Accounts for `cycles` of emulated time, sleeping when enough has
    /// accumulated. Returns the time slept.
    pub fn wait(&mut self, cycles: u64) -> Duration {
        let Some(cycle_nanos) = self.cycle_nanos else {
            return Duration::ZERO;
        };

        self.owed += Duration::from_nanos(cycles.saturating_mul(cycle_nanos));
        if self.owed < MIN_SLEEP {
            return Duration::ZERO;
        }

        // Time spent emulating since the last sleep already counts.
        let elapsed = self.last_sleep.map_or(Duration::ZERO, |at| at.elapsed());
        let debt = self.owed.saturating_sub(elapsed);
        self.owed = Duration::ZERO;

        if !debt.is_zero() {
            thread::sleep(debt);
        }
        self.last_sleep = Some(Instant::now());
        debt
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::unthrottled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unthrottled_never_sleeps() {
        let mut ticker = Ticker::unthrottled();
        assert!(!ticker.is_throttled());
        assert_eq!(ticker.wait(1_000_000), Duration::ZERO);
        assert_eq!(ticker.owed(), Duration::ZERO);
    }

    #[test]
    fn test_small_debts_accumulate() {
        let mut ticker = Ticker::new(1_000_000);
        assert_eq!(ticker.wait(7), Duration::ZERO);
        assert_eq!(ticker.owed(), Duration::from_micros(7));
    }

    #[test]
    fn test_sleeps_once_a_millisecond_is_owed() {
        let mut ticker = Ticker::new(1_000_000);
        let start = Instant::now();

        let slept = ticker.wait(2_000);

        assert_eq!(slept, Duration::from_millis(2));
        assert!(start.elapsed() >= Duration::from_millis(2));
        assert_eq!(ticker.owed(), Duration::ZERO);
    }
}
