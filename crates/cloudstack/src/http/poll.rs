//! Backoff between async job status queries.
//!
//! The delay ramps up linearly so short jobs finish quickly while long jobs
//! do not flood the management server with status queries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default poll configuration values.
const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;
const DEFAULT_INCREMENT_MS: u64 = 1000;
const DEFAULT_MAX_DELAY_MS: u64 = 15000;

/// Configuration for the delay between job status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Delay after the first status query, in milliseconds.
    pub initial_delay_ms: u64,
    /// Amount added to the delay after every further query, in milliseconds.
    pub increment_ms: u64,
    /// Upper bound for the delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            increment_ms: DEFAULT_INCREMENT_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl PollPolicy {
    /// Create a policy that waits the same amount between every query.
    pub fn fixed(delay_ms: u64) -> Self {
        Self {
            initial_delay_ms: delay_ms,
            increment_ms: 0,
            max_delay_ms: delay_ms,
        }
    }

    /// Create a policy that queries again without sleeping.
    pub fn no_delay() -> Self {
        Self::fixed(0)
    }

    /// Calculate the delay after the given number of status queries.
    ///
    /// No delay before the first query; afterwards
    /// `initial_delay + increment * (queries - 1)`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, queries: u32) -> Duration {
        if queries == 0 {
            return Duration::ZERO;
        }

        let ramp = self
            .increment_ms
            .saturating_mul(u64::from(queries - 1))
            .saturating_add(self.initial_delay_ms);

        Duration::from_millis(ramp.min(self.max_delay_ms))
    }
}
