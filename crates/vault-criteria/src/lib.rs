//! Composable query criteria for StateVault.
//!
//! Callers describe what they want as an immutable [`Criteria`] tree:
//! conjunctions and disjunctions of typed leaves (status constraints, field
//! constraints, category constraints, custom aggregates). [`compile`] lowers
//! a tree plus a sort specification and a target category into the
//! backend-neutral [`vault_store::NativeQuery`] building blocks, consulting a
//! per-call [`vault_registry::Resolution`] to expand abstract categories into
//! concrete-type filters.
//!
//! # Key Types
//!
//! - [`Criteria`] — the composable filter tree
//! - [`AggregateFn`] — custom aggregate projections (row count)
//! - [`CompiledQuery`] — projections + predicate + order + resolved state types
//! - [`CriteriaError`] — compilation failures (unknown field, misplaced aggregate)

pub mod compile;
pub mod criteria;
pub mod error;

pub use compile::{compile, CompiledQuery};
pub use criteria::{AggregateFn, Criteria};
pub use error::{CriteriaError, CriteriaResult};
