//! Idle backoff for log tailing

use std::time::Duration;

/// Doubling delay with a ceiling
///
/// Starts at zero so the first idle round re-polls immediately, then
/// `unit`, `2 * unit`, ... capped at `ceiling`.
#[derive(Debug, Clone)]
pub struct Backoff {
    unit: Duration,
    ceiling: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(unit: Duration, ceiling: Duration) -> Self {
        Self {
            unit,
            ceiling,
            current: Duration::ZERO,
        }
    }

    /// Delay to wait now; advances the sequence
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = if delay.is_zero() {
            self.unit.min(self.ceiling)
        } else {
            (delay * 2).min(self.ceiling)
        };
        delay
    }

    /// Back to zero after progress
    pub fn reset(&mut self) {
        self.current = Duration::ZERO;
    }
}
