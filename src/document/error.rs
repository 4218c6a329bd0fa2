//! Errors raised by the editing engine.

use thiserror::Error;

/// Failures of a document edit.
///
/// Duplicate inserts and removals that match nothing are not errors; see
/// [`crate::document::Insertion::AlreadyExists`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A section the edit depends on is absent.
    #[error("Invalid config: '{missing}:' section not found.")]
    MalformedDocument { missing: &'static str },

    /// Entity identifier was empty after trimming.
    #[error("Hostname is required")]
    EmptyEntity,
}

/// Result type for engine operations.
pub type EditResult<T> = Result<T, EditError>;
