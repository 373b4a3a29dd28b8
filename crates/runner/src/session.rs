//! Research session
//!
//! Owns one run's pipeline components and the run-level data-quality
//! policy. Snapshots are processed strictly in arrival order; the session
//! is the only caller of the engine, matching the single-owner state model.

use kairos_backtest::{BacktestConfig, BacktestEngine, BacktestError, ReportRecord};
use kairos_core::{OrderBookSnapshot, Trade};
use kairos_feed::SnapshotSource;
use kairos_strategy::{DeltaComputer, DeltaStrategy};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ResearchConfig;
use crate::error::{Result, RunnerError};

/// Data-quality and progress counters for one run
///
/// Every condition the session tolerates ends up here, so an upstream
/// problem can never hide behind a clean-looking report.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Snapshots received from the source
    pub iterations: u64,
    /// Snapshots dropped because their timestamp regressed
    pub out_of_order_skips: u64,
    /// Snapshots observed with best bid >= best ask
    pub crossed_books: u64,
}

/// One backtest run: delta computer + strategy + engine + policy
pub struct ResearchSession {
    config: ResearchConfig,
    computer: DeltaComputer,
    strategy: DeltaStrategy,
    engine: BacktestEngine,
    /// Baseline snapshot for the next delta; the first snapshot of a run
    /// only ever becomes this
    previous: Option<OrderBookSnapshot>,
    /// Last valid reference price seen, for final position valuation
    last_price: Decimal,
    stats: SessionStats,
    run_id: Uuid,
}

impl ResearchSession {
    /// Build a session from a validated configuration
    pub fn new(config: ResearchConfig) -> Result<Self> {
        config.validate()?;
        let computer = DeltaComputer::new(config.depth)?;
        let strategy = DeltaStrategy::new(config.delta_threshold)?;
        let engine = BacktestEngine::new(BacktestConfig {
            initial_balance: config.initial_balance,
            trade_quantity: config.trade_quantity,
        })?;
        let run_id = Uuid::new_v4();
        log::info!(
            "Session {run_id}: {} threshold={} quantity={}",
            config.symbol,
            config.delta_threshold,
            config.trade_quantity
        );
        Ok(Self {
            config,
            computer,
            strategy,
            engine,
            previous: None,
            last_price: Decimal::ZERO,
            stats: SessionStats::default(),
            run_id,
        })
    }

    /// Process a single snapshot
    ///
    /// Returns the executed trade, if any. Recoverable conditions are
    /// returned as errors so the caller decides the loop policy:
    /// [`RunnerError::OutOfOrderSnapshot`] and
    /// [`BacktestError::InvalidPrice`] are counted here and safe to
    /// continue past; anything else (symbol mismatch in particular) should
    /// end the run.
    pub fn observe(&mut self, snapshot: OrderBookSnapshot) -> Result<Option<Trade>> {
        if let Some(previous) = &self.previous {
            if snapshot.timestamp < previous.timestamp {
                self.stats.out_of_order_skips += 1;
                return Err(RunnerError::OutOfOrderSnapshot {
                    previous: previous.timestamp,
                    got: snapshot.timestamp,
                });
            }
        }

        if snapshot.is_crossed() {
            self.stats.crossed_books += 1;
            log::warn!(
                "[{}] crossed book at {}: best bid >= best ask",
                snapshot.symbol,
                snapshot.timestamp
            );
        }

        // Mid price of the current snapshot is the reference price for the
        // step; ZERO stands in when the book is one-sided and is refused by
        // the engine as an invalid price
        let reference_price = snapshot.mid_price().unwrap_or(Decimal::ZERO);
        if reference_price > Decimal::ZERO {
            self.last_price = reference_price;
        }

        let result = match self.previous.take() {
            None => {
                // First snapshot: nothing to diff against, becomes the baseline
                log::debug!("[{}] baseline snapshot at {}", snapshot.symbol, snapshot.timestamp);
                Ok(None)
            }
            Some(previous) => match self.computer.compute(&previous, &snapshot) {
                Ok(delta) => {
                    let event = self.strategy.classify(&delta);
                    self.engine
                        .step(&event, reference_price)
                        .map_err(RunnerError::from)
                }
                Err(err) => Err(err.into()),
            },
        };

        self.previous = Some(snapshot);
        result
    }

    /// Drive a snapshot source until it is exhausted or `max_iterations`
    /// snapshots have been processed
    pub async fn run(&mut self, source: &mut (dyn SnapshotSource + Send)) -> Result<()> {
        log::info!("Session {}: starting backtest", self.run_id);
        while self.stats.iterations < self.config.max_iterations {
            let Some(snapshot) = source.next_snapshot().await? else {
                log::info!("Session {}: snapshot stream exhausted", self.run_id);
                break;
            };
            self.stats.iterations += 1;

            match self.observe(snapshot) {
                Ok(_) => {}
                Err(err @ RunnerError::OutOfOrderSnapshot { .. }) => {
                    log::warn!("Session {}: {err}", self.run_id);
                }
                Err(RunnerError::Backtest(err @ BacktestError::InvalidPrice { .. })) => {
                    log::warn!("Session {}: {err}", self.run_id);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Counters so far
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Unique id of this run, for log correlation only
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Finish the run, producing the report and the final counters
    pub fn finish(self) -> (ReportRecord, SessionStats) {
        let initial_balance = self.engine.initial_balance();
        let final_balance = self.engine.balance();
        let final_position = self.engine.position();
        let skipped_ticks = self.engine.skipped_ticks();
        let report = ReportRecord::summarize(
            self.config.symbol,
            initial_balance,
            final_balance,
            final_position,
            self.last_price,
            self.engine.into_trades(),
            skipped_ticks,
        );
        (report, self.stats)
    }
}
