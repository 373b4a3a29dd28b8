//! Backtest engine
//!
//! Processes a strictly ordered sequence of signal events, one step per
//! event, mutating position and balance and appending to the trade ledger.
//! Step `i` sees only information available up to snapshot `i` - there is
//! no look-ahead, no randomness, and no wall-clock dependency, so the same
//! inputs always produce the same ledger.
//!
//! PnL is attributed per trade against the running average entry price:
//! reducing fills realize PnL, extending fills re-weight the entry, a fill
//! that flips the position direction resets the entry to the fill price.

use kairos_core::{Signal, SignalEvent, Trade};
use rust_decimal::Decimal;
use rust_decimal::prelude::Signed;

use crate::error::{BacktestError, Result};

/// Engine configuration
///
/// Passed in explicitly at construction so concurrent runs (parameter
/// sweeps) cannot contaminate each other through ambient state.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    /// Starting cash balance (quote currency)
    pub initial_balance: Decimal,
    /// Fixed quantity traded per actionable signal (base currency)
    pub trade_quantity: Decimal,
}

impl BacktestConfig {
    /// Validate the configuration
    ///
    /// Out-of-range values are rejected here, before a run starts, never
    /// mid-run.
    pub fn validate(&self) -> Result<()> {
        if self.initial_balance <= Decimal::ZERO {
            return Err(BacktestError::NonPositiveBalance(self.initial_balance));
        }
        if self.trade_quantity <= Decimal::ZERO {
            return Err(BacktestError::NonPositiveQuantity(self.trade_quantity));
        }
        Ok(())
    }
}

/// Stateful backtest engine for a single run
///
/// Exclusively owned by one session; never share an instance across
/// logical callers.
#[derive(Debug)]
pub struct BacktestEngine {
    config: BacktestConfig,
    /// Cash balance; only ever changes through a logged trade
    balance: Decimal,
    /// Signed position: positive = long, negative = short
    position: Decimal,
    /// Running average entry price of the open position
    avg_entry: Decimal,
    /// Accumulated realized PnL across all reducing fills
    realized_pnl: Decimal,
    /// Append-only trade ledger
    trades: Vec<Trade>,
    /// Steps refused because the reference price was invalid
    skipped_ticks: u64,
}

impl BacktestEngine {
    /// Create an engine, validating the configuration
    pub fn new(config: BacktestConfig) -> Result<Self> {
        config.validate()?;
        log::info!(
            "Backtest engine ready: balance={} quantity={}",
            config.initial_balance,
            config.trade_quantity
        );
        Ok(Self {
            balance: config.initial_balance,
            position: Decimal::ZERO,
            avg_entry: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            trades: Vec::new(),
            skipped_ticks: 0,
            config,
        })
    }

    /// Process one signal event at the given reference price
    ///
    /// Returns `Ok(Some(trade))` when the signal executed, `Ok(None)` for a
    /// Hold. A non-positive reference price fails the step before the
    /// signal is even considered: nothing mutates, the tick is counted in
    /// [`skipped_ticks`](Self::skipped_ticks), and the error is returned so
    /// the caller can log it - a skipped tick must never be mistaken for a
    /// Hold decision.
    pub fn step(&mut self, event: &SignalEvent, reference_price: Decimal) -> Result<Option<Trade>> {
        if reference_price <= Decimal::ZERO {
            self.skipped_ticks += 1;
            return Err(BacktestError::InvalidPrice {
                price: reference_price,
                timestamp: event.timestamp,
            });
        }

        let signed_qty = match event.signal {
            Signal::Buy => self.config.trade_quantity,
            Signal::Sell => -self.config.trade_quantity,
            Signal::Hold => return Ok(None),
        };

        let realized = self.apply_fill(signed_qty, reference_price);
        self.balance -= signed_qty * reference_price;

        let trade = Trade {
            timestamp: event.timestamp,
            signal: event.signal,
            price: reference_price,
            quantity: self.config.trade_quantity,
            position: self.position,
            realized_pnl: realized,
            delta: event.delta,
        };
        self.trades.push(trade.clone());

        log::info!(
            "Trade executed: {} {} @ {} -> position={} balance={}",
            trade.signal.as_str(),
            trade.quantity,
            trade.price,
            self.position,
            self.balance
        );

        Ok(Some(trade))
    }

    /// Apply a signed fill to the position, returning the realized PnL of
    /// the reducing portion
    fn apply_fill(&mut self, signed_qty: Decimal, price: Decimal) -> Decimal {
        let mut realized = Decimal::ZERO;

        // Reducing (partially or fully closing against the open position)
        if (self.position > Decimal::ZERO && signed_qty < Decimal::ZERO)
            || (self.position < Decimal::ZERO && signed_qty > Decimal::ZERO)
        {
            let close_qty = signed_qty.abs().min(self.position.abs());
            realized = if self.position > Decimal::ZERO {
                close_qty * (price - self.avg_entry)
            } else {
                close_qty * (self.avg_entry - price)
            };
        }

        let new_position = self.position + signed_qty;

        if new_position.is_zero() {
            // Flat, reset entry
            self.avg_entry = Decimal::ZERO;
        } else if (self.position >= Decimal::ZERO && signed_qty > Decimal::ZERO)
            || (self.position <= Decimal::ZERO && signed_qty < Decimal::ZERO)
        {
            // Extending - weighted average entry
            let total_cost = self.position.abs() * self.avg_entry + signed_qty.abs() * price;
            self.avg_entry = total_cost / new_position.abs();
        } else if new_position.signum() != self.position.signum() {
            // Flipped sides - entry restarts at the fill price
            self.avg_entry = price;
        }
        // Reducing without flipping keeps the entry unchanged

        self.position = new_position;
        self.realized_pnl += realized;
        realized
    }

    /// Unrealized PnL of the open position at a mark price
    pub fn unrealized_pnl(&self, mark_price: Decimal) -> Decimal {
        if self.position.is_zero() {
            Decimal::ZERO
        } else if self.position > Decimal::ZERO {
            self.position * (mark_price - self.avg_entry)
        } else {
            self.position.abs() * (self.avg_entry - mark_price)
        }
    }

    /// Configured starting balance
    pub fn initial_balance(&self) -> Decimal {
        self.config.initial_balance
    }

    /// Current cash balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Current signed position
    pub fn position(&self) -> Decimal {
        self.position
    }

    /// Average entry price of the open position (zero when flat)
    pub fn avg_entry_price(&self) -> Decimal {
        self.avg_entry
    }

    /// Accumulated realized PnL
    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    /// The trade ledger so far
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Number of steps refused due to an invalid reference price
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks
    }

    /// Consume the engine, returning the ledger
    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn event(signal: Signal, delta: Decimal, secs: i64) -> SignalEvent {
        SignalEvent {
            signal,
            delta,
            timestamp: ts(secs),
        }
    }

    fn engine(quantity: Decimal) -> BacktestEngine {
        BacktestEngine::new(BacktestConfig {
            initial_balance: dec!(10000),
            trade_quantity: quantity,
        })
        .unwrap()
    }

    #[test]
    fn test_config_rejects_non_positive_balance() {
        let err = BacktestEngine::new(BacktestConfig {
            initial_balance: Decimal::ZERO,
            trade_quantity: dec!(0.1),
        })
        .unwrap_err();
        assert!(matches!(err, BacktestError::NonPositiveBalance(_)));
    }

    #[test]
    fn test_config_rejects_non_positive_quantity() {
        let err = BacktestEngine::new(BacktestConfig {
            initial_balance: dec!(10000),
            trade_quantity: dec!(-0.1),
        })
        .unwrap_err();
        assert!(matches!(err, BacktestError::NonPositiveQuantity(_)));
    }

    #[test]
    fn test_buy_moves_balance_and_position() {
        let mut eng = engine(dec!(0.1));
        let trade = eng
            .step(&event(Signal::Buy, dec!(0.15), 1), dec!(3000))
            .unwrap()
            .unwrap();

        assert_eq!(trade.position, dec!(0.1));
        assert_eq!(eng.position(), dec!(0.1));
        assert_eq!(eng.balance(), dec!(9700.0));
        assert_eq!(eng.avg_entry_price(), dec!(3000));
    }

    #[test]
    fn test_sell_from_flat_opens_short() {
        let mut eng = engine(dec!(0.1));
        let trade = eng
            .step(&event(Signal::Sell, dec!(-0.2), 1), dec!(3000))
            .unwrap()
            .unwrap();

        assert_eq!(trade.position, dec!(-0.1));
        assert_eq!(eng.balance(), dec!(10300.0));
        assert_eq!(eng.avg_entry_price(), dec!(3000));
    }

    #[test]
    fn test_hold_is_not_logged() {
        let mut eng = engine(dec!(0.1));
        let result = eng.step(&event(Signal::Hold, dec!(0.05), 1), dec!(3000)).unwrap();

        assert!(result.is_none());
        assert!(eng.trades().is_empty());
        assert_eq!(eng.balance(), dec!(10000));
        assert_eq!(eng.position(), Decimal::ZERO);
    }

    #[test]
    fn test_reduce_realizes_pnl_and_keeps_entry() {
        let mut eng = engine(dec!(1));

        // Buy 1 @ 100, buy 1 @ 110 -> entry 105
        eng.step(&event(Signal::Buy, dec!(1), 1), dec!(100)).unwrap();
        eng.step(&event(Signal::Buy, dec!(1), 2), dec!(110)).unwrap();
        assert_eq!(eng.avg_entry_price(), dec!(105));

        // Sell 1 @ 120 realizes 15, entry unchanged
        let trade = eng
            .step(&event(Signal::Sell, dec!(-1), 3), dec!(120))
            .unwrap()
            .unwrap();
        assert_eq!(trade.realized_pnl, dec!(15));
        assert_eq!(eng.position(), dec!(1));
        assert_eq!(eng.avg_entry_price(), dec!(105));
        assert_eq!(eng.realized_pnl(), dec!(15));
        assert_eq!(eng.unrealized_pnl(dec!(130)), dec!(25));
    }

    #[test]
    fn test_short_round_trip() {
        let mut eng = engine(dec!(1));

        // Short 1 @ 100, cover @ 90 -> +10 realized
        eng.step(&event(Signal::Sell, dec!(-1), 1), dec!(100)).unwrap();
        let trade = eng
            .step(&event(Signal::Buy, dec!(1), 2), dec!(90))
            .unwrap()
            .unwrap();

        assert_eq!(trade.realized_pnl, dec!(10));
        assert_eq!(eng.position(), Decimal::ZERO);
        assert_eq!(eng.avg_entry_price(), Decimal::ZERO);
    }

    #[test]
    fn test_flip_resets_entry_to_fill_price() {
        // With a fixed per-signal quantity the public API only ever closes
        // exactly to flat, but the fill arithmetic stays general; pin the
        // flip rule directly: long 1 @ 100, fill -2 @ 110 realizes 10 on
        // the closed unit and restarts the short's entry at the fill price
        let mut eng = engine(dec!(1));
        eng.apply_fill(dec!(1), dec!(100));
        let realized = eng.apply_fill(dec!(-2), dec!(110));

        assert_eq!(realized, dec!(10));
        assert_eq!(eng.position(), dec!(-1));
        assert_eq!(eng.avg_entry_price(), dec!(110));
    }

    #[test]
    fn test_invalid_price_skips_without_mutation() {
        let mut eng = engine(dec!(0.1));
        let err = eng
            .step(&event(Signal::Buy, dec!(0.15), 1), Decimal::ZERO)
            .unwrap_err();

        assert!(matches!(err, BacktestError::InvalidPrice { .. }));
        assert_eq!(eng.balance(), dec!(10000));
        assert_eq!(eng.position(), Decimal::ZERO);
        assert!(eng.trades().is_empty());
        assert_eq!(eng.skipped_ticks(), 1);
    }

    #[test]
    fn test_invalid_price_counts_even_on_hold() {
        // Validated before the signal branch: a Hold at a broken price is
        // still a skipped tick, not a strategy decision
        let mut eng = engine(dec!(0.1));
        let err = eng
            .step(&event(Signal::Hold, dec!(0.0), 1), dec!(-1))
            .unwrap_err();

        assert!(matches!(err, BacktestError::InvalidPrice { .. }));
        assert_eq!(eng.skipped_ticks(), 1);
    }

    #[test]
    fn test_balance_conservation() {
        // finalBalance + sum of signed cash flows == initialBalance
        let mut eng = engine(dec!(0.5));
        eng.step(&event(Signal::Buy, dec!(1), 1), dec!(100)).unwrap();
        eng.step(&event(Signal::Sell, dec!(-1), 2), dec!(105)).unwrap();
        eng.step(&event(Signal::Buy, dec!(1), 3), dec!(102)).unwrap();

        let flows: Decimal = eng
            .trades()
            .iter()
            .map(|t| match t.signal {
                Signal::Buy => -t.notional(),
                Signal::Sell => t.notional(),
                Signal::Hold => Decimal::ZERO,
            })
            .sum();
        assert_eq!(eng.balance(), eng.initial_balance() + flows);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut eng = engine(dec!(0.1));
            eng.step(&event(Signal::Buy, dec!(0.15), 1), dec!(3000)).unwrap();
            eng.step(&event(Signal::Sell, dec!(-0.2), 2), dec!(3010)).unwrap();
            eng.step(&event(Signal::Hold, dec!(0.05), 3), dec!(3005)).unwrap();
            (eng.balance(), eng.position(), eng.into_trades())
        };
        assert_eq!(run(), run());
    }
}
