//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Store read:
//!     → reqwest client (connect/request timeout)
//!     → On failure: retries.rs (check if retryable, wait per backoff.rs, retry)
//!
//! Store write:
//!     → reqwest client (connect/request timeout), single attempt
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retries only for idempotent reads
//! - Jittered backoff prevents synchronized retries

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{RetryPolicy, Retryable};
