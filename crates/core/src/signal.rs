//! Trading signals
//!
//! The discrete decision derived from a delta and a threshold. A signal
//! event tags the decision with the delta value that triggered it, so the
//! ledger can always answer "why did this trade happen".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::delta::Delta;

/// Discrete trading decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }

    /// Does this signal request an execution?
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }
}

/// A signal tagged with the delta that triggered it
///
/// Produced one-to-one from each delta; the first snapshot of a run has no
/// predecessor to diff against and yields no event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    /// The decision
    pub signal: Signal,
    /// Delta value that produced the decision
    pub delta: Decimal,
    /// Timestamp of the snapshot the delta was attached to
    pub timestamp: DateTime<Utc>,
}

impl SignalEvent {
    /// Create a signal event from the delta it classifies
    pub fn from_delta(signal: Signal, delta: &Delta) -> Self {
        Self {
            signal,
            delta: delta.value,
            timestamp: delta.timestamp,
        }
    }
}
