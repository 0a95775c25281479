use thiserror::Error;

/// Errors produced by foundation type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("consumed timestamp is only valid on consumed records")]
    ConsumedTimestampMismatch,
}
