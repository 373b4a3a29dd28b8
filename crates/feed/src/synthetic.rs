//! Synthetic book generator
//!
//! Generates a random-walk order book stream for offline runs: the mid
//! price drifts a few basis points per tick and the level sizes are
//! perturbed around a base size. Seeded - the same configuration always
//! produces the same stream, so offline runs are reproducible end to end.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use kairos_core::{BookLevel, OrderBookSnapshot};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::source::SnapshotSource;

/// Configuration for the synthetic feed
#[derive(Debug, Clone)]
pub struct SyntheticFeedConfig {
    /// Symbol stamped on every snapshot
    pub symbol: String,
    /// Starting mid price
    pub initial_mid: Decimal,
    /// Price distance between adjacent levels (also the half-spread)
    pub tick_size: Decimal,
    /// Levels generated per side
    pub levels: usize,
    /// Base quantity per level before perturbation
    pub base_size: Decimal,
    /// Timestamp of the first snapshot
    pub start_time: DateTime<Utc>,
    /// Seconds between consecutive snapshots
    pub tick_interval_secs: i64,
    /// RNG seed; identical seeds give identical streams
    pub seed: u64,
}

impl Default for SyntheticFeedConfig {
    fn default() -> Self {
        Self {
            symbol: "ETHUSDT".to_string(),
            initial_mid: Decimal::from(3000),
            tick_size: Decimal::new(5, 1), // 0.5
            levels: 5,
            base_size: Decimal::TWO,
            // Fixed epoch, not the wall clock: reruns must reproduce
            // timestamps exactly
            start_time: DateTime::UNIX_EPOCH + Duration::seconds(1_750_000_000),
            tick_interval_secs: 1,
            seed: 42,
        }
    }
}

/// Seeded random-walk snapshot source
pub struct SyntheticFeed {
    config: SyntheticFeedConfig,
    mid: Decimal,
    ticks: i64,
    rng: StdRng,
}

impl SyntheticFeed {
    /// Create a feed from its configuration
    pub fn new(config: SyntheticFeedConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let mid = config.initial_mid;
        Self {
            config,
            mid,
            ticks: 0,
            rng,
        }
    }

    /// Generate the next snapshot
    fn generate(&mut self) -> OrderBookSnapshot {
        // Multiplicative drift of up to +/-30 bps keeps the mid positive
        let drift_bps: i64 = self.rng.gen_range(-30..=30);
        self.mid += self.mid * Decimal::new(drift_bps, 4);

        let timestamp = self.config.start_time
            + Duration::seconds(self.ticks * self.config.tick_interval_secs);
        self.ticks += 1;

        let mut bids = Vec::with_capacity(self.config.levels);
        let mut asks = Vec::with_capacity(self.config.levels);
        for i in 0..self.config.levels {
            let offset = self.config.tick_size * Decimal::from(i as u64 + 1);
            // Sizes perturbed between 50% and 150% of the base size
            let bid_size = self.config.base_size * Decimal::new(self.rng.gen_range(50..=150), 2);
            let ask_size = self.config.base_size * Decimal::new(self.rng.gen_range(50..=150), 2);
            bids.push(BookLevel::new(self.mid - offset, bid_size));
            asks.push(BookLevel::new(self.mid + offset, ask_size));
        }

        OrderBookSnapshot::new(self.config.symbol.clone(), timestamp, bids, asks)
    }
}

#[async_trait]
impl SnapshotSource for SyntheticFeed {
    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    async fn next_snapshot(&mut self) -> Result<Option<OrderBookSnapshot>> {
        Ok(Some(self.generate()))
    }
}
