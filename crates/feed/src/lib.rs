//! Kairos Feed
//!
//! Snapshot acquisition for the research pipeline. The core never fetches
//! anything itself - it consumes already-parsed [`OrderBookSnapshot`]
//! values from a [`SnapshotSource`]:
//!
//! - [`ReplaySource`] - iterates captured snapshots (in-memory or from a
//!   JSON capture file); what the tests and re-runs use
//! - [`SyntheticFeed`] - seeded random-walk book generator for offline runs
//! - [`BybitRestSource`] - polls Bybit's v5 order book endpoint
//!
//! Retrying a flaky exchange is this crate's concern, not the pipeline's:
//! the REST source logs transient failures and keeps polling, giving up
//! only after a bounded number of consecutive failures.
//!
//! [`OrderBookSnapshot`]: kairos_core::OrderBookSnapshot

pub mod bybit;
pub mod error;
pub mod replay;
pub mod source;
pub mod synthetic;

// Re-export main types
pub use bybit::{BybitClient, BybitRestSource};
pub use error::{FeedError, Result};
pub use replay::ReplaySource;
pub use source::SnapshotSource;
pub use synthetic::{SyntheticFeed, SyntheticFeedConfig};
