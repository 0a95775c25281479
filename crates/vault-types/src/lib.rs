//! Foundation types for StateVault.
//!
//! This crate provides the core reference, record, and paging types used
//! throughout the StateVault query layer. Every other vault crate depends on
//! `vault-types`.
//!
//! # Key Types
//!
//! - [`TxId`] — 32-byte transaction identifier (BLAKE3-derivable, hex display)
//! - [`StateRef`] — unique state reference: transaction id + output index
//! - [`StateRecord`] — one persisted ledger state with status/lock/notary metadata
//! - [`StateStatus`] — consumption status filter (`Unconsumed`/`Consumed`/`All`)
//! - [`SerializedState`] — opaque serialized state payload
//! - [`PageSpecification`] — explicit pagination request
//! - [`Sort`] — ordered sort columns; insertion order is tie-break precedence

pub mod error;
pub mod paging;
pub mod record;
pub mod reference;

pub use error::TypeError;
pub use paging::{PageSpecification, Sort, SortColumn, SortDirection, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use record::{Notary, SerializedState, StateRecord, StateStatus, ROOT_CATEGORY};
pub use reference::{StateRef, TxId};
