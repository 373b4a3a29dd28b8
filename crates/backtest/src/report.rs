//! Performance report
//!
//! Pure reduction of a finished run into the record the reporting side
//! consumes. Produced once at the end of a run, read-only thereafter.

use chrono::{DateTime, Utc};
use kairos_core::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot-in-time summary of a backtest run plus its full trade ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Symbol the run traded
    pub symbol: String,
    /// Configured starting balance
    pub initial_balance: Decimal,
    /// Cash balance at the end of the run
    pub final_balance: Decimal,
    /// Signed open position at the end of the run
    pub final_position: Decimal,
    /// final_position * last reference price
    pub position_value: Decimal,
    /// final_balance + position_value
    pub total_value: Decimal,
    /// total_value - initial_balance
    pub pnl: Decimal,
    /// pnl as a percentage of the initial balance
    pub pnl_pct: Decimal,
    /// Number of executed trades
    pub trade_count: usize,
    /// Steps refused because the reference price was invalid
    pub skipped_ticks: u64,
    /// Timestamp of the first trade, if any
    pub first_trade_at: Option<DateTime<Utc>>,
    /// Timestamp of the last trade, if any
    pub last_trade_at: Option<DateTime<Utc>>,
    /// The full trade ledger
    pub trades: Vec<Trade>,
}

impl ReportRecord {
    /// Summarize a finished run
    ///
    /// Pure over its inputs - no hidden state, no clock. `last_price` is
    /// the last known reference price (zero when the run never saw a
    /// two-sided book, in which case no trades exist either). The
    /// zero-trade case produces a complete record: nothing here divides by
    /// the trade count.
    #[allow(clippy::too_many_arguments)]
    pub fn summarize(
        symbol: impl Into<String>,
        initial_balance: Decimal,
        final_balance: Decimal,
        final_position: Decimal,
        last_price: Decimal,
        trades: Vec<Trade>,
        skipped_ticks: u64,
    ) -> Self {
        let position_value = final_position * last_price;
        let total_value = final_balance + position_value;
        let pnl = total_value - initial_balance;
        let pnl_pct = if initial_balance.is_zero() {
            Decimal::ZERO
        } else {
            pnl / initial_balance * Decimal::ONE_HUNDRED
        };

        Self {
            symbol: symbol.into(),
            initial_balance,
            final_balance,
            final_position,
            position_value,
            total_value,
            pnl,
            pnl_pct,
            trade_count: trades.len(),
            skipped_ticks,
            first_trade_at: trades.first().map(|t| t.timestamp),
            last_trade_at: trades.last().map(|t| t.timestamp),
            trades,
        }
    }
}
