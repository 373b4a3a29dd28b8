//! Strategy errors

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Symbol mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: String, actual: String },

    #[error("Invalid threshold {0}: must be non-negative")]
    InvalidThreshold(Decimal),

    #[error("Invalid depth: must be at least 1")]
    InvalidDepth,
}

pub type Result<T> = std::result::Result<T, StrategyError>;
