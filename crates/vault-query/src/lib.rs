//! Paginated query execution for StateVault.
//!
//! Takes a [`vault_criteria::CompiledQuery`] and runs it against a
//! [`vault_store::VaultStore`], enforcing the pagination contract:
//!
//! - explicit paging triggers a count-only round-trip with the identical
//!   predicate, so `total_states_available` stays consistent with the filter;
//! - the main query fetches one sentinel row beyond the page size to detect
//!   further pages without ever returning the sentinel;
//! - omitting paging is allowed only for small results: exceeding the
//!   default bound fails fast instead of silently truncating;
//! - aggregate-only queries never paginate.
//!
//! # Key Types
//!
//! - [`QueryExecutor`] — runs compiled queries against the store
//! - [`ExecutorConfig`] — the two paging bounds (default and maximum)
//! - [`ResultPage`] — records + auxiliary scalars + total count
//! - [`QueryError`] — the caller-facing error taxonomy

pub mod error;
pub mod executor;
pub mod page;

pub use error::{QueryError, QueryResult};
pub use executor::{ExecutorConfig, QueryExecutor};
pub use page::ResultPage;
