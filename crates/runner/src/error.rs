//! Runner errors

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Strategy(#[from] kairos_strategy::StrategyError),

    #[error("Backtest error: {0}")]
    Backtest(#[from] kairos_backtest::BacktestError),

    #[error("Feed error: {0}")]
    Feed(#[from] kairos_feed::FeedError),

    #[error("Symbol must not be empty")]
    EmptySymbol,

    #[error("Out-of-order snapshot: {got} arrived after {previous}, skipped")]
    OutOfOrderSnapshot {
        previous: DateTime<Utc>,
        got: DateTime<Utc>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
