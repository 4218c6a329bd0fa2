//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Delay schedule between attempts: `base * 2^(n-1)`, capped, plus up to 10% jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base_ms: u64,
    max_ms: u64,
}

impl Backoff {
    pub fn new(base_ms: u64, max_ms: u64) -> Self {
        Self { base_ms, max_ms }
    }

    /// Delay before retry number `attempt` (1-based); zero for attempt 0.
    pub fn delay(&self, attempt: u32) -> Duration {
        let capped = self.capped_ms(attempt);
        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };
        Duration::from_millis(capped + jitter)
    }

    fn capped_ms(&self, attempt: u32) -> u64 {
        if attempt == 0 {
            return 0;
        }
        let factor = 2u64.saturating_pow(attempt - 1);
        self.base_ms.saturating_mul(factor).min(self.max_ms)
    }
}

impl From<&RetryConfig> for Backoff {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.base_delay_ms, config.max_delay_ms)
    }
}
