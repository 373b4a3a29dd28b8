//! Kairos Strategy
//!
//! The two pure pipeline stages between raw snapshots and the backtest
//! engine:
//!
//! - [`DeltaComputer`] - diffs two consecutive snapshots into a scalar
//!   volume-shift delta
//! - [`DeltaStrategy`] - classifies a delta into Buy/Sell/Hold with a
//!   threshold rule
//!
//! Both are stateless and referentially transparent: identical inputs give
//! identical outputs, which is what makes backtest runs reproducible. Any
//! invalid input here is the caller's bug and fails loudly - nothing is
//! caught.

pub mod delta;
pub mod error;
pub mod threshold;

// Re-export main types
pub use delta::DeltaComputer;
pub use error::{Result, StrategyError};
pub use threshold::DeltaStrategy;
