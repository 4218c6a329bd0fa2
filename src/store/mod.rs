//! Remote storage of the Traefik document.
//!
//! # Data Flow
//! ```text
//! operations layer
//!     → ConfigStore::read(target)   → document text
//!     → [edit engine]
//!     → ConfigStore::write(target, text) → acknowledgement text
//!
//! Implementations:
//!     dokploy.rs (HTTP, Dokploy application API)
//!     memory.rs  (in-process map keyed by application id)
//! ```
//!
//! # Design Decisions
//! - The store is addressed per call through a [`StoreTarget`], so one process
//!   can serve several applications
//! - Read-modify-write is not transactional; the last writer wins

pub mod dokploy;
pub mod memory;
pub mod target;

use async_trait::async_trait;
use thiserror::Error;

use crate::resilience::Retryable;

pub use dokploy::DokployStore;
pub use memory::MemoryStore;
pub use target::StoreTarget;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to {operation} config. HTTP status: {status}\nResponse: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid store target: {0}")]
    InvalidTarget(String),
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        match self {
            StoreError::Http(e) => !e.is_builder() && !e.is_decode(),
            StoreError::Status { status, .. } => *status >= 500,
            StoreError::InvalidTarget(_) => false,
        }
    }
}

/// Source and sink of Traefik documents.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Current document text.
    async fn read(&self, target: &StoreTarget) -> Result<String, StoreError>;

    /// Replace the document; returns the store's acknowledgement.
    async fn write(&self, target: &StoreTarget, document: &str) -> Result<String, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let status = |status| StoreError::Status {
            operation: "fetch",
            status,
            body: String::new(),
        };
        assert!(status(503).is_retryable());
        assert!(!status(404).is_retryable());
        assert!(!StoreError::InvalidTarget("x".into()).is_retryable());
    }

    #[test]
    fn test_status_message() {
        let err = StoreError::Status {
            operation: "update",
            status: 401,
            body: "denied".into(),
        };
        assert_eq!(err.to_string(), "Failed to update config. HTTP status: 401\nResponse: denied");
    }
}
