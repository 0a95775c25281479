//! Contract-type registry for StateVault.
//!
//! Persisted states carry only a concrete type name. Queries, however, may
//! target an abstract category ("give me every `FungibleAsset`"). This crate
//! resolves the set of concrete type names currently persisted into a reverse
//! index `abstract category -> concrete types`, by walking each type's
//! declared category relations through an external metadata collaborator.
//!
//! The resolution is rebuilt per query execution and never cached: the set of
//! concrete types grows as new contract implementations are recorded, and a
//! stale cache would silently miss them.
//!
//! # Key Types
//!
//! - [`TypeDescriptor`] — a type or category plus its directly declared categories
//! - [`TypeDescriptorSource`] — the type-metadata collaborator trait
//! - [`StaticDescriptorSource`] — map-backed source for tests and embedding
//! - [`Resolution`] — the per-call reverse index with best-effort failures

pub mod descriptor;
pub mod error;
pub mod resolve;

pub use descriptor::{StaticDescriptorSource, TypeDescriptor, TypeDescriptorSource};
pub use error::{RegistryError, RegistryResult};
pub use resolve::{resolve, Resolution};
