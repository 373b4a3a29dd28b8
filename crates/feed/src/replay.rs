//! Replay source
//!
//! Replays a captured snapshot sequence, either handed over in memory (the
//! integration tests build their streams this way) or loaded from a JSON
//! capture file. Re-running a capture with the same configuration must
//! reproduce the report byte for byte.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use async_trait::async_trait;
use kairos_core::OrderBookSnapshot;

use crate::error::Result;
use crate::source::SnapshotSource;

/// Snapshot source backed by a captured sequence
#[derive(Debug, Clone)]
pub struct ReplaySource {
    symbol: String,
    snapshots: VecDeque<OrderBookSnapshot>,
}

impl ReplaySource {
    /// Create a replay over an in-memory capture
    pub fn new(snapshots: Vec<OrderBookSnapshot>) -> Self {
        let symbol = snapshots
            .first()
            .map(|s| s.symbol.clone())
            .unwrap_or_default();
        Self {
            symbol,
            snapshots: snapshots.into(),
        }
    }

    /// Load a capture file (a JSON array of snapshots)
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let snapshots: Vec<OrderBookSnapshot> = serde_json::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded {} snapshots from {}",
            snapshots.len(),
            path.as_ref().display()
        );
        Ok(Self::new(snapshots))
    }

    /// Remaining snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait]
impl SnapshotSource for ReplaySource {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn next_snapshot(&mut self) -> Result<Option<OrderBookSnapshot>> {
        Ok(self.snapshots.pop_front())
    }
}
