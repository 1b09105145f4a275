//! Virtual time.

use std::time::{Duration, Instant};

/// Virtual clock over a fixed base instant.
///
/// Only moves when told to, and never backwards.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    base: Instant,
    elapsed: Duration,
}

impl SimClock {
    /// Clock at zero elapsed time.
    pub fn new() -> Self {
        Self { base: Instant::now(), elapsed: Duration::ZERO }
    }

    /// Current virtual instant.
    pub fn now(&self) -> Instant {
        self.base + self.elapsed
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time at `instant`, saturating at zero.
    pub fn offset_of(&self, instant: Instant) -> Duration {
        instant.saturating_duration_since(self.base)
    }

    /// Move to `elapsed` unless that is in the past.
    pub fn advance_to(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.max(elapsed);
    }

    /// Move forward by `step`.
    pub fn advance(&mut self, step: Duration) {
        self.elapsed += step;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}
