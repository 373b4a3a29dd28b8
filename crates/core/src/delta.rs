//! Delta - the order book imbalance metric
//!
//! A delta is the net volume shift between two consecutive snapshots of the
//! same symbol: how much the bid side grew relative to the ask side. It is
//! ephemeral - computed, classified into a signal, discarded.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Signed volume-shift metric derived from two consecutive snapshots
///
/// Positive values mean bid-side volume grew relative to ask-side volume
/// (buy pressure building), negative the opposite. Carries the timestamp of
/// the newer snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Symbol the underlying snapshots belong to
    pub symbol: String,
    /// Net volume shift: (bid volume change) - (ask volume change)
    pub value: Decimal,
    /// Timestamp of the newer snapshot
    pub timestamp: DateTime<Utc>,
}

impl Delta {
    /// Create a new delta
    pub fn new(symbol: impl Into<String>, value: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            value,
            timestamp,
        }
    }
}
