use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::debug;

use crate::update::{UpdateFilter, VaultUpdate};

/// A broadcast receiver carrying vault updates.
///
/// Receivers buffer everything sent from the moment of subscription until
/// first read, then replay in order. This is the buffer-then-replay
/// primitive the snapshot seam relies on.
pub type UpdateStream = broadcast::Receiver<VaultUpdate>;

/// Configuration for the [`UpdatePublisher`].
#[derive(Clone, Copy, Debug)]
pub struct FeedConfig {
    /// Capacity of per-subscriber broadcast channels.
    pub channel_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: UpdateFilter,
    sender: broadcast::Sender<VaultUpdate>,
}

/// Fan-out router delivering updates to matching subscribers.
struct Router {
    subscribers: Vec<Subscriber>,
    channel_capacity: usize,
}

impl Router {
    fn subscribe(&mut self, filter: UpdateFilter) -> UpdateStream {
        let (tx, rx) = broadcast::channel(self.channel_capacity);
        self.subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    /// Route an update to all matching subscribers, pruning closed channels.
    fn route(&mut self, update: &VaultUpdate) {
        self.subscribers.retain(|sub| {
            if sub.filter.matches(update) {
                // If send fails (no receivers), the subscriber is stale.
                sub.sender.send(update.clone()).is_ok()
            } else {
                // Keep non-matching subscribers; they may match future
                // updates. Only prune if the channel itself is closed.
                sub.sender.receiver_count() > 0
            }
        });
    }
}

/// The shared update-publish collaborator.
///
/// One instance is shared across all concurrent `track` callers and the
/// write path. The internal mutex serializes three things against each
/// other: publishing, committing-then-publishing, and the snapshot-plus-
/// subscribe critical section, so "read current state, then subscribe" is
/// observed as a single atomic step. The lock is held only for those
/// operations, never for the lifetime of a feed.
pub struct UpdatePublisher {
    router: Mutex<Router>,
}

impl UpdatePublisher {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            router: Mutex::new(Router {
                subscribers: Vec::new(),
                channel_capacity: config.channel_capacity,
            }),
        }
    }

    /// Publish one update to all matching subscribers, in publish order.
    pub fn publish(&self, update: VaultUpdate) {
        let mut router = self.router.lock().expect("router lock poisoned");
        router.route(&update);
        debug!(
            produced = update.produced.len(),
            consumed = update.consumed.len(),
            "update published"
        );
    }

    /// Run a store-commit closure and publish its update under one lock.
    ///
    /// This is the write-path contract: holding the router lock across
    /// commit + publish means a concurrent snapshot either sees the commit
    /// and not the update, or the update and not the commit. Never both,
    /// never neither.
    pub fn commit_and_publish<T, E>(
        &self,
        commit: impl FnOnce() -> Result<(T, VaultUpdate), E>,
    ) -> Result<T, E> {
        let mut router = self.router.lock().expect("router lock poisoned");
        let (value, update) = commit()?;
        router.route(&update);
        Ok(value)
    }

    /// Attach a standalone subscription outside any snapshot.
    pub fn subscribe(&self, filter: UpdateFilter) -> UpdateStream {
        self.router
            .lock()
            .expect("router lock poisoned")
            .subscribe(filter)
    }

    /// THE snapshot seam: capture a snapshot and attach a subscription as
    /// one serialized critical section against all publishers.
    ///
    /// Every update published strictly after the snapshot closure's read is
    /// buffered by the returned stream and delivered exactly once, in
    /// publish order; everything published strictly before is visible to
    /// the snapshot.
    pub fn snapshot_and_subscribe<T, E>(
        &self,
        filter: UpdateFilter,
        snapshot: impl FnOnce() -> Result<T, E>,
    ) -> Result<(T, UpdateStream), E> {
        let mut router = self.router.lock().expect("router lock poisoned");
        let value = snapshot()?;
        let stream = router.subscribe(filter);
        Ok((value, stream))
    }

    /// Number of live subscribers (stale ones are pruned on publish).
    pub fn subscriber_count(&self) -> usize {
        self.router
            .lock()
            .expect("router lock poisoned")
            .subscribers
            .len()
    }
}

impl Default for UpdatePublisher {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

impl std::fmt::Debug for UpdatePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePublisher")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
