//! Research run configuration
//!
//! All knobs are passed in explicitly at construction - nothing is read
//! from ambient/global state - so parameter sweeps can run many sessions
//! side by side without cross-contamination. Out-of-range values are
//! rejected at startup, never mid-run.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use kairos_backtest::BacktestConfig;
use kairos_strategy::StrategyError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunnerError};

/// Configuration for one research run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Symbol to research
    pub symbol: String,
    /// Signal threshold on the delta value
    pub delta_threshold: Decimal,
    /// Starting cash balance
    pub initial_balance: Decimal,
    /// Fixed quantity traded per actionable signal
    pub trade_quantity: Decimal,
    /// Snapshots processed before the run stops
    pub max_iterations: u64,
    /// Book levels summed per side for the delta
    pub depth: usize,
    /// Milliseconds between REST polls (live mode)
    pub poll_interval_ms: u64,
    /// Poll the exchange testnet rather than mainnet (live mode)
    pub testnet: bool,
    /// Poll the exchange instead of generating a synthetic stream
    pub live: bool,
    /// Seed for the synthetic stream (offline mode)
    pub seed: u64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            symbol: "ETHUSDT".to_string(),
            delta_threshold: dec!(0.1),
            initial_balance: dec!(10000),
            trade_quantity: dec!(0.1),
            max_iterations: 100,
            depth: 25,
            poll_interval_ms: 1000,
            testnet: true,
            live: false,
            seed: 42,
        }
    }
}

impl ResearchConfig {
    /// Load a configuration from a JSON file; missing fields fall back to
    /// the defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Validate every recognized option
    ///
    /// Surfaces the first configuration error before any snapshot is
    /// processed; a run with an invalid configuration never starts. The
    /// checks mirror what the component constructors enforce.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(RunnerError::EmptySymbol);
        }
        if self.delta_threshold < Decimal::ZERO {
            return Err(StrategyError::InvalidThreshold(self.delta_threshold).into());
        }
        if self.depth == 0 {
            return Err(StrategyError::InvalidDepth.into());
        }
        BacktestConfig {
            initial_balance: self.initial_balance,
            trade_quantity: self.trade_quantity,
        }
        .validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ResearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = ResearchConfig {
            delta_threshold: dec!(-0.1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RunnerError::Strategy(_))
        ));
    }

    #[test]
    fn test_non_positive_balance_rejected() {
        let config = ResearchConfig {
            initial_balance: Decimal::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RunnerError::Backtest(_))
        ));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let config = ResearchConfig {
            trade_quantity: dec!(-1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RunnerError::Backtest(_))
        ));
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let config = ResearchConfig {
            symbol: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RunnerError::EmptySymbol)));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ResearchConfig =
            serde_json::from_str(r#"{"symbol": "BTCUSDT", "delta_threshold": "0.5"}"#).unwrap();
        assert_eq!(config.symbol, "BTCUSDT");
        assert_eq!(config.delta_threshold, dec!(0.5));
        assert_eq!(config.max_iterations, 100);
    }
}
