//! Live update feeds for StateVault.
//!
//! A single [`UpdatePublisher`] instance is shared by the write path and all
//! feed consumers. The write path commits and publishes under the publisher's
//! lock; [`UpdatePublisher::snapshot_and_subscribe`] takes the same lock to
//! capture a snapshot and attach a subscription as one atomic step. The
//! result: every update strictly after the snapshot's read instant reaches
//! the feed exactly once, in publish order, and everything before it is in
//! the snapshot. Nothing is lost or duplicated at the seam.
//!
//! # Key Types
//!
//! - [`VaultUpdate`] — produced/consumed records of one committed change
//! - [`UpdateFilter`] — state-type filter applied at fan-out
//! - [`UpdatePublisher`] — lock-guarded router over broadcast channels
//! - [`VaultFeed`] — a snapshot page plus the live update stream

pub mod error;
pub mod feed;
pub mod publisher;
pub mod update;

pub use error::{FeedError, FeedResult};
pub use feed::VaultFeed;
pub use publisher::{FeedConfig, UpdatePublisher, UpdateStream};
pub use update::{UpdateFilter, VaultUpdate};
