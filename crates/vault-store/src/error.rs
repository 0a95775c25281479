use thiserror::Error;

use vault_types::StateRef;

/// Errors produced by the storage boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A state with the given reference is already recorded.
    #[error("state already recorded: {0}")]
    DuplicateState(StateRef),

    /// No state with the given reference exists.
    #[error("state not found: {0}")]
    StateNotFound(StateRef),

    /// The native query is malformed (e.g. an empty projection list).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Failure inside a storage backend.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Convenience alias used throughout the store crate.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
