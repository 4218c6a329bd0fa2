//! Retry logic for store calls.
//!
//! # Responsibilities
//! - Decide whether a failed call may be repeated
//! - Execute retries with exponential backoff + jitter
//!
//! # Design Decisions
//! - Only idempotent reads go through here; writes are sent exactly once
//! - Transport errors and 5xx responses are retryable; 4xx never are
//! - The last error is returned unchanged once attempts are exhausted

use std::future::Future;

use crate::config::RetryConfig;
use crate::resilience::backoff::Backoff;

/// Failure classification consulted by [`RetryPolicy::run`].
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::new(1, Backoff::new(0, 0))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `call` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && e.is_retryable() => {
                    let delay = self.backoff.delay(attempt);
                    tracing::warn!(
                        operation,
                        attempt,
                        delay = ?delay,
                        error = %e,
                        "Retrying store call"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        if config.enabled {
            Self::new(config.max_attempts, Backoff::from(config))
        } else {
            Self::none()
        }
    }
}
