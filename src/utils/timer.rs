//! Wall-clock timing for checks and rounds

use std::time::{Duration, Instant};
use tracing::debug;

/// Measures how long a check or round took
#[derive(Debug)]
pub struct Timer {
    started: Instant,
    label: String,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            started: Instant::now(),
            label: label.into(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed milliseconds, saturating at `u64::MAX`
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Consume the timer, logging the duration at debug level
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        debug!("{} finished in {}ms", self.label, elapsed.as_millis());
        elapsed
    }
}
