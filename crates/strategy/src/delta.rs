//! Snapshot delta computation
//!
//! Diffs two consecutive snapshots of the same symbol into a single signed
//! volume-shift value:
//!
//! ```text
//! delta = (bid_vol(current) - bid_vol(previous))
//!       - (ask_vol(current) - ask_vol(previous))
//! ```
//!
//! which is the per-frame change of the book's (bid - ask) volume
//! imbalance. Volumes are summed over the top `depth` levels of each side;
//! an empty side sums to zero.

use kairos_core::{Delta, OrderBookSnapshot};

use crate::error::{Result, StrategyError};

/// Default number of levels summed per side, matching the usual L2 fetch
/// depth.
pub const DEFAULT_DEPTH: usize = 25;

/// Stateless snapshot-pair delta computer
///
/// Pure function of its two inputs: no signal or trade history feeds back
/// into the metric, so the same snapshot pair always yields the same delta.
#[derive(Debug, Clone, Copy)]
pub struct DeltaComputer {
    depth: usize,
}

impl Default for DeltaComputer {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl DeltaComputer {
    /// Create a computer summing the top `depth` levels per side
    pub fn new(depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(StrategyError::InvalidDepth);
        }
        Ok(Self { depth })
    }

    /// Number of levels summed per side
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Compute the delta between two consecutive snapshots
    ///
    /// `previous` and `current` must belong to the same symbol; mixing
    /// symbols is a caller error and is rejected rather than silently
    /// computed. The returned delta carries the timestamp of `current`.
    pub fn compute(
        &self,
        previous: &OrderBookSnapshot,
        current: &OrderBookSnapshot,
    ) -> Result<Delta> {
        if previous.symbol != current.symbol {
            return Err(StrategyError::SymbolMismatch {
                expected: previous.symbol.clone(),
                actual: current.symbol.clone(),
            });
        }

        let bid_shift = current.bid_volume(self.depth) - previous.bid_volume(self.depth);
        let ask_shift = current.ask_volume(self.depth) - previous.ask_volume(self.depth);
        let value = bid_shift - ask_shift;

        log::trace!(
            "[delta] {} bid_shift={} ask_shift={} value={}",
            current.symbol,
            bid_shift,
            ask_shift,
            value
        );

        Ok(Delta::new(current.symbol.clone(), value, current.timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use kairos_core::BookLevel;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn snapshot(secs: i64, bids: Vec<(Decimal, Decimal)>, asks: Vec<(Decimal, Decimal)>) -> OrderBookSnapshot {
        OrderBookSnapshot::new(
            "ETHUSDT",
            ts(secs),
            bids.into_iter().map(|(p, q)| BookLevel::new(p, q)).collect(),
            asks.into_iter().map(|(p, q)| BookLevel::new(p, q)).collect(),
        )
    }

    #[test]
    fn test_identical_volumes_give_zero_delta() {
        let prev = snapshot(1, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(1.5))]);
        let curr = snapshot(2, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(1.5))]);

        let delta = DeltaComputer::default().compute(&prev, &curr).unwrap();
        assert_eq!(delta.value, Decimal::ZERO);
        assert_eq!(delta.timestamp, ts(2));
    }

    #[test]
    fn test_bid_growth_is_positive() {
        let prev = snapshot(1, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(1.5))]);
        let curr = snapshot(2, vec![(dec!(3000), dec!(2.6))], vec![(dec!(3001), dec!(1.5))]);

        let delta = DeltaComputer::default().compute(&prev, &curr).unwrap();
        assert_eq!(delta.value, dec!(0.6));
    }

    #[test]
    fn test_ask_growth_is_negative() {
        let prev = snapshot(1, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(1.5))]);
        let curr = snapshot(2, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(2.5))]);

        let delta = DeltaComputer::default().compute(&prev, &curr).unwrap();
        assert_eq!(delta.value, dec!(-1.0));
    }

    #[test]
    fn test_empty_side_counts_as_zero_volume() {
        let prev = snapshot(1, vec![(dec!(3000), dec!(2.0))], vec![]);
        let curr = snapshot(2, vec![(dec!(3000), dec!(3.0))], vec![(dec!(3001), dec!(0.5))]);

        // bid shift = 1.0, ask shift = 0.5 - 0
        let delta = DeltaComputer::default().compute(&prev, &curr).unwrap();
        assert_eq!(delta.value, dec!(0.5));
    }

    #[test]
    fn test_depth_limits_the_sums() {
        let prev = snapshot(
            1,
            vec![(dec!(3000), dec!(1.0)), (dec!(2999), dec!(5.0))],
            vec![(dec!(3001), dec!(1.0))],
        );
        let curr = snapshot(
            2,
            vec![(dec!(3000), dec!(2.0)), (dec!(2999), dec!(9.0))],
            vec![(dec!(3001), dec!(1.0))],
        );

        // Only the best bid level is visible at depth 1
        let delta = DeltaComputer::new(1).unwrap().compute(&prev, &curr).unwrap();
        assert_eq!(delta.value, dec!(1.0));

        let delta = DeltaComputer::default().compute(&prev, &curr).unwrap();
        assert_eq!(delta.value, dec!(5.0));
    }

    #[test]
    fn test_symbol_mismatch_is_rejected() {
        let prev = snapshot(1, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(1.5))]);
        let mut curr = snapshot(2, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(1.5))]);
        curr.symbol = "BTCUSDT".to_string();

        let err = DeltaComputer::default().compute(&prev, &curr).unwrap_err();
        assert!(matches!(err, StrategyError::SymbolMismatch { .. }));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        assert!(matches!(
            DeltaComputer::new(0),
            Err(StrategyError::InvalidDepth)
        ));
    }

    #[test]
    fn test_determinism() {
        let prev = snapshot(1, vec![(dec!(3000), dec!(2.0))], vec![(dec!(3001), dec!(1.5))]);
        let curr = snapshot(2, vec![(dec!(3000), dec!(2.4))], vec![(dec!(3001), dec!(1.2))]);

        let computer = DeltaComputer::default();
        let a = computer.compute(&prev, &curr).unwrap();
        let b = computer.compute(&prev, &curr).unwrap();
        assert_eq!(a, b);
    }
}
