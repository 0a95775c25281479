use thiserror::Error;

/// Errors surfaced while consuming a live feed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    /// The consumer fell behind the channel capacity and missed updates.
    #[error("feed consumer lagged behind by {0} updates")]
    Lagged(u64),

    /// The publisher side has gone away.
    #[error("feed closed by publisher")]
    Closed,
}

/// Convenience alias used throughout the feed crate.
pub type FeedResult<T> = std::result::Result<T, FeedError>;
