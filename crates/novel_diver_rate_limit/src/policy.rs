//! Backoff policy.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How many times to retry a rate-limited call and how long to wait.
///
/// The wait before retry `n` (counting from zero) is `base_delay * 2^n`, so the
/// defaults sleep 1s, 2s, then 4s across four attempts.
///
/// ```toml
/// [retry]
/// max_retries = 3
/// base_delay_secs = 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    /// Delay before the first retry, in seconds
    #[serde(default = "default_base_delay_secs")]
    base_delay_secs: f64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_secs() -> f64 {
    1.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_secs: default_base_delay_secs(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay_secs: base_delay.as_secs_f64(),
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before the first retry.
    ///
    /// Negative or non-finite `base_delay_secs` values from configuration are treated as zero.
    pub fn base_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_delay_secs).unwrap_or(Duration::ZERO)
    }

    /// The sleep schedule, one entry per permitted retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base = self.base_delay();
        (0..self.max_retries).map(move |attempt| base.saturating_mul(2u32.saturating_pow(attempt)))
    }
}
