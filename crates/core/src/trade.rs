//! Trade ledger records
//!
//! One record per executed signal, appended to the run's ledger and never
//! mutated afterwards. Records carry no generated ids and no wall-clock
//! fields: two runs over the same snapshot stream must produce
//! byte-identical ledgers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::signal::Signal;

/// An executed virtual trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Timestamp of the snapshot the triggering signal was derived from
    pub timestamp: DateTime<Utc>,
    /// The signal that caused the execution (Buy or Sell, never Hold)
    pub signal: Signal,
    /// Execution price (mid price of the current snapshot)
    pub price: Decimal,
    /// Executed quantity (the configured fixed trade quantity)
    pub quantity: Decimal,
    /// Signed position after this trade (positive = long, negative = short)
    pub position: Decimal,
    /// Realized PnL contribution of this trade relative to the running
    /// average entry price; zero when opening or extending a position
    pub realized_pnl: Decimal,
    /// Delta value that triggered the signal
    pub delta: Decimal,
}

impl Trade {
    /// Returns the notional value of the trade (price * quantity)
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}
