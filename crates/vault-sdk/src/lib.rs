//! High-level SDK for StateVault.
//!
//! Provides the [`VaultService`] facade: `query_by` for one-shot paged
//! queries and `track_by` for gap-free snapshot-plus-live-updates feeds.
//! This is the main entry point for applications embedding the vault query
//! layer.

pub mod service;

pub use service::VaultService;

// Re-export key types
pub use vault_criteria::{compile, AggregateFn, CompiledQuery, Criteria, CriteriaError};
pub use vault_feed::{FeedConfig, UpdateFilter, UpdatePublisher, VaultFeed, VaultUpdate};
pub use vault_query::{ExecutorConfig, QueryError, QueryResult, ResultPage};
pub use vault_registry::{
    resolve, RegistryError, Resolution, StaticDescriptorSource, TypeDescriptor,
    TypeDescriptorSource,
};
pub use vault_store::{
    Column, CompareOp, InMemoryVaultStore, Literal, Predicate, ScalarValue, VaultStore,
};
pub use vault_types::{
    Notary, PageSpecification, SerializedState, Sort, SortColumn, SortDirection, StateRecord,
    StateRef, StateStatus, TxId, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ROOT_CATEGORY,
};
