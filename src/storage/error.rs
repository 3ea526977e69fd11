//! Store failure taxonomy

use thiserror::Error;

/// Failures reported by the persistence collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("a user with this email address already exists")]
    DuplicateEmail,

    /// Optimistic version check failed
    #[error("edit conflict")]
    EditConflict,

    /// The call did not finish within the configured query deadline
    #[error("store call timed out")]
    Timeout,

    #[error("store has been closed")]
    Closed,

    #[error("store backend error: {0}")]
    Backend(String),
}
