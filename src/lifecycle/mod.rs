//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging → Metrics → Store client → Bind listener
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → stop accepting → finish in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No reload signal; configuration changes require a restart or the
//!   runtime defaults API

pub mod signals;

pub use signals::shutdown_signal;
