//! Backtest errors

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Initial balance must be positive, got {0}")]
    NonPositiveBalance(Decimal),

    #[error("Trade quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    #[error("Invalid reference price {price} at {timestamp}, tick skipped")]
    InvalidPrice {
        price: Decimal,
        timestamp: DateTime<Utc>,
    },
}

pub type Result<T> = std::result::Result<T, BacktestError>;
