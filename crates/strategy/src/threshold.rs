//! Threshold signal rule
//!
//! Maps a delta to a discrete decision:
//!
//! - delta >  threshold -> Buy
//! - delta < -threshold -> Sell
//! - otherwise          -> Hold
//!
//! The boundary is exclusive: a delta exactly at +/-threshold is Hold.

use kairos_core::{Delta, Signal, SignalEvent};
use rust_decimal::Decimal;

use crate::error::{Result, StrategyError};

/// Orderbook delta momentum strategy
///
/// Pure function of the delta and the configured threshold; holds no
/// position or history state.
#[derive(Debug, Clone)]
pub struct DeltaStrategy {
    threshold: Decimal,
}

impl DeltaStrategy {
    /// Create a strategy with the given threshold
    ///
    /// The threshold must be non-negative; a negative value is a
    /// configuration error and is rejected here, never at classify time.
    pub fn new(threshold: Decimal) -> Result<Self> {
        if threshold < Decimal::ZERO {
            return Err(StrategyError::InvalidThreshold(threshold));
        }
        log::info!("Delta strategy initialized with threshold {}", threshold);
        Ok(Self { threshold })
    }

    /// Configured threshold
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Classify a delta into a signal event
    pub fn classify(&self, delta: &Delta) -> SignalEvent {
        let signal = if delta.value > self.threshold {
            Signal::Buy
        } else if delta.value < -self.threshold {
            Signal::Sell
        } else {
            Signal::Hold
        };

        if signal.is_actionable() {
            log::debug!(
                "[{}] {} signal: delta={} threshold={}",
                delta.symbol,
                signal.as_str(),
                delta.value,
                self.threshold
            );
        }

        SignalEvent::from_delta(signal, delta)
    }
}
