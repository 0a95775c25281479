use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use vault_query::ResultPage;

use crate::error::{FeedError, FeedResult};
use crate::publisher::UpdateStream;
use crate::update::VaultUpdate;

/// A point-in-time snapshot plus the live stream of subsequent matching
/// updates.
///
/// The snapshot and the stream were composed atomically against the shared
/// publisher, so the stream starts exactly where the snapshot ends. Dropping
/// the feed releases the underlying subscription.
#[derive(Debug)]
pub struct VaultFeed {
    /// The immutable snapshot page.
    pub snapshot: ResultPage,
    /// Ordered, duplicate-free stream of updates after the snapshot.
    pub updates: UpdateStream,
}

impl VaultFeed {
    pub fn new(snapshot: ResultPage, updates: UpdateStream) -> Self {
        Self { snapshot, updates }
    }

    /// Non-blocking poll for the next update.
    ///
    /// Returns `Ok(None)` when no update is pending yet.
    pub fn try_next(&mut self) -> FeedResult<Option<VaultUpdate>> {
        match self.updates.try_recv() {
            Ok(update) => Ok(Some(update)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(FeedError::Closed),
            Err(TryRecvError::Lagged(n)) => Err(FeedError::Lagged(n)),
        }
    }

    /// Block until the next update arrives.
    ///
    /// Must not be called from within an async runtime; async consumers
    /// should await `self.updates.recv()` directly.
    pub fn blocking_next(&mut self) -> FeedResult<VaultUpdate> {
        match self.updates.blocking_recv() {
            Ok(update) => Ok(update),
            Err(RecvError::Closed) => Err(FeedError::Closed),
            Err(RecvError::Lagged(n)) => Err(FeedError::Lagged(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::{FeedConfig, UpdatePublisher};
    use crate::update::UpdateFilter;
    use std::collections::BTreeSet;

    fn empty_page() -> ResultPage {
        ResultPage {
            states: Vec::new(),
            state_types: BTreeSet::new(),
            total_states_available: None,
            other_results: Vec::new(),
        }
    }

    #[test]
    fn try_next_reports_empty_as_none() {
        let publisher = UpdatePublisher::default();
        let stream = publisher.subscribe(UpdateFilter::all());
        let mut feed = VaultFeed::new(empty_page(), stream);
        assert_eq!(feed.try_next(), Ok(None));
    }

    #[test]
    fn closed_publisher_surfaces_as_closed() {
        let publisher = UpdatePublisher::default();
        let stream = publisher.subscribe(UpdateFilter::all());
        let mut feed = VaultFeed::new(empty_page(), stream);
        drop(publisher);
        assert_eq!(feed.try_next(), Err(FeedError::Closed));
    }

    #[test]
    fn lag_is_reported_not_hidden() {
        let publisher = UpdatePublisher::new(FeedConfig {
            channel_capacity: 2,
        });
        let stream = publisher.subscribe(UpdateFilter::all());
        let mut feed = VaultFeed::new(empty_page(), stream);

        for _ in 0..5 {
            publisher.publish(crate::update::VaultUpdate::default());
        }
        // Capacity 2 with 5 sends: the oldest three are gone.
        assert_eq!(feed.try_next(), Err(FeedError::Lagged(3)));
    }
}
