//! Snapshot source trait

use async_trait::async_trait;
use kairos_core::OrderBookSnapshot;

use crate::error::Result;

/// An ordered stream of order book snapshots for a single symbol
///
/// Implementations must deliver snapshots with non-decreasing timestamps in
/// arrival order; the session still verifies monotonicity and skips
/// regressions, since an upstream exchange can misbehave.
#[async_trait]
pub trait SnapshotSource: Send {
    /// Symbol this source produces snapshots for
    fn symbol(&self) -> &str;

    /// Produce the next snapshot
    ///
    /// `Ok(None)` means the stream is exhausted (a replay ran out, or a
    /// bounded source finished); live sources block until data arrives.
    async fn next_snapshot(&mut self) -> Result<Option<OrderBookSnapshot>>;
}
