//! Order book snapshots
//!
//! A snapshot is the full visible L2 state of one side pair at a point in
//! time, immutable once captured. Bids are ordered best-first (prices
//! strictly decreasing), asks best-first (prices strictly increasing); a
//! snapshot violating that ordering is a data-quality condition the session
//! reports, not a fatal error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order book level (price + quantity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl BookLevel {
    /// Create a new book level
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

/// Immutable L2 order book snapshot for a single symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Symbol this snapshot belongs to
    pub symbol: String,
    /// Exchange timestamp of the snapshot
    pub timestamp: DateTime<Utc>,
    /// Bid levels, best (highest price) first
    pub bids: Vec<BookLevel>,
    /// Ask levels, best (lowest price) first
    pub asks: Vec<BookLevel>,
}

impl OrderBookSnapshot {
    /// Create a new snapshot
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            bids,
            asks,
        }
    }

    /// Get best bid price and quantity
    pub fn best_bid(&self) -> Option<(Decimal, Decimal)> {
        self.bids.first().map(|l| (l.price, l.quantity))
    }

    /// Get best ask price and quantity
    pub fn best_ask(&self) -> Option<(Decimal, Decimal)> {
        self.asks.first().map(|l| (l.price, l.quantity))
    }

    /// Get mid price (average of best bid and ask)
    ///
    /// `None` when either side is empty; the session maps that to an
    /// invalid reference price rather than guessing.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Get spread (ask - bid)
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }

    /// Total bid quantity over the top `depth` levels
    ///
    /// An empty side sums to zero.
    pub fn bid_volume(&self, depth: usize) -> Decimal {
        self.bids.iter().take(depth).map(|l| l.quantity).sum()
    }

    /// Total ask quantity over the top `depth` levels
    pub fn ask_volume(&self, depth: usize) -> Decimal {
        self.asks.iter().take(depth).map(|l| l.quantity).sum()
    }

    /// Check if the book has both sides (a mid price exists)
    pub fn is_two_sided(&self) -> bool {
        !self.bids.is_empty() && !self.asks.is_empty()
    }

    /// Check if the book is crossed (best bid >= best ask)
    ///
    /// A healthy book has best bid < best ask; a crossed snapshot is a
    /// data-quality condition, counted by the session and processed anyway.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => bid >= ask,
            _ => false,
        }
    }
}
