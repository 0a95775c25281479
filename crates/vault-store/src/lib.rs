//! Storage boundary for StateVault.
//!
//! This crate defines the language the query layer speaks to its storage
//! collaborator: a typed, backend-neutral query representation plus the
//! [`VaultStore`] trait. The criteria compiler lowers caller-facing criteria
//! into a [`NativeQuery`]; any backend that can answer one can serve the
//! vault.
//!
//! # Key Types
//!
//! - [`Column`] — the closed queryable schema of a state record
//! - [`Predicate`] — backend-neutral filter tree with total evaluation
//! - [`Projection`] — statically tagged row shape (`Records` or `CountRows`)
//! - [`NativeQuery`] — projections + predicate + order + offset/limit
//! - [`QueryRow`] — tagged result row: record-shaped or scalar-shaped
//! - [`VaultStore`] — the storage-collaborator trait
//! - [`InMemoryVaultStore`] — `BTreeMap`-based backend for tests and embedding

pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryVaultStore;
pub use query::{
    Column, CompareOp, Literal, NativeQuery, OrderBy, Predicate, Projection, QueryRow, ScalarValue,
};
pub use traits::VaultStore;
