//! Engine configuration
//!
//! Pacing of the polling loops. Defaults match what the job service expects
//! from well-behaved clients; override them through the environment.

use std::time::Duration;

use crate::error::{EngineError, Result};

/// Pacing for state polling and log tailing
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed delay between two job-state polls
    pub poll_interval: Duration,

    /// First non-zero delay of the log tail backoff
    pub backoff_unit: Duration,

    /// Upper bound for the log tail backoff
    pub backoff_ceiling: Duration,
}

impl EngineConfig {
    /// Creates configuration from environment variables
    ///
    /// Optional environment variables (seconds):
    /// - JOBLINE_POLL_INTERVAL (default: 5)
    /// - JOBLINE_BACKOFF_CEILING (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let poll_interval = std::env::var("JOBLINE_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        let backoff_ceiling = std::env::var("JOBLINE_BACKOFF_CEILING")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.backoff_ceiling);

        Self {
            poll_interval,
            backoff_ceiling,
            ..defaults
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(EngineError::Config(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.backoff_unit.is_zero() {
            return Err(EngineError::Config(
                "backoff_unit must be greater than 0".to_string(),
            ));
        }

        if self.backoff_ceiling < self.backoff_unit {
            return Err(EngineError::Config(
                "backoff_ceiling must not be below backoff_unit".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            backoff_unit: Duration::from_secs(1),
            backoff_ceiling: Duration::from_secs(30),
        }
    }
}
