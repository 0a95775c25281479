use thiserror::Error;

/// Errors produced by criteria compilation.
///
/// These are caller mistakes: not retryable without changing the criteria.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CriteriaError {
    /// A referenced field does not exist on the compiled schema.
    #[error("unknown field in criteria: {0}")]
    UnknownField(String),

    /// An aggregate leaf appeared inside a disjunction; a disjunctive branch
    /// cannot conditionally add a projection.
    #[error("aggregate projection is not allowed inside an OR branch")]
    AggregateInDisjunction,
}

/// Convenience alias used throughout the criteria crate.
pub type CriteriaResult<T> = std::result::Result<T, CriteriaError>;
