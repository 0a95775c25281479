use thiserror::Error;

use vault_criteria::CriteriaError;
use vault_store::StoreError;

/// Caller-facing errors of the vault query layer.
///
/// Nothing is retried internally; every variant carries enough context to
/// diagnose and retry. Storage failures are wrapped with their cause
/// preserved, never swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Bad page number or page size. Reported immediately, no retry.
    #[error("invalid page specification: {reason} (page {page_number}, size {page_size})")]
    InvalidPageSpecification {
        page_number: usize,
        page_size: usize,
        reason: &'static str,
    },

    /// An unpaged query matched more records than the safety threshold.
    /// Retry with an explicit page specification.
    #[error(
        "query matched more than {threshold} results; use an explicit page specification"
    )]
    TooManyResults { threshold: usize },

    /// The criteria tree failed to compile.
    #[error("criteria compilation failed: {0}")]
    Criteria(#[from] CriteriaError),

    /// The count-only round-trip returned no scalar row.
    #[error("storage returned no scalar row for a count-only query")]
    MissingCount,

    /// Any unanticipated storage-layer failure, original cause preserved.
    #[error("vault query failed: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the query crate.
pub type QueryResult<T> = std::result::Result<T, QueryError>;
