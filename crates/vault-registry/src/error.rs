use thiserror::Error;

/// Errors produced during contract-type resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A recorded concrete type name could not be loaded: the stored type is
    /// no longer available to the running process. Retryable by the caller;
    /// other types still resolve.
    #[error("contract type cannot be loaded: {0}")]
    UnknownType(String),
}

/// Convenience alias used throughout the registry crate.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
