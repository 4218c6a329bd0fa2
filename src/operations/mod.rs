//! Host operations: the layer between the REST API and the edit engine.
//!
//! # Data Flow
//! ```text
//! request (hostname + Overrides)
//!     → defaults.rs (load one Defaults snapshot)
//!     → overrides.rs (resolve → ResolvedRequest { target, targets, options })
//!     → store::ConfigStore::read
//!     → document::Editor (add / remove / bindings)
//!     → store::ConfigStore::write (only when the document changed)
//!     → HostOperation { message, updated_config, hostname }
//! ```
//!
//! # Design Decisions
//! - "Already exists" and "not found" are successful outcomes, never errors
//! - A request sees exactly one defaults snapshot even if they are updated
//!   concurrently

pub mod defaults;
pub mod host;
pub mod overrides;

use thiserror::Error;

use crate::document::EditError;
use crate::store::StoreError;

pub use defaults::{Defaults, DefaultsHandle, DefaultsUpdate};
pub use host::{HostManager, HostOperation, Outcome};
pub use overrides::{Overrides, ResolvedRequest};

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
