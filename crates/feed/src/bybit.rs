//! Bybit REST adapter
//!
//! Minimal client for Bybit's v5 market data API, plus a polling
//! [`SnapshotSource`] built on top of it. Prices and sizes arrive as JSON
//! strings and are parsed straight into `Decimal`, so nothing non-finite
//! can cross into the pipeline.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use kairos_core::{BookLevel, OrderBookSnapshot};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{FeedError, Result};
use crate::source::SnapshotSource;

const MAINNET_HOST: &str = "https://api.bybit.com";
const TESTNET_HOST: &str = "https://api-testnet.bybit.com";

/// Poll failures tolerated in a row before the source gives up
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// v5 API envelope
#[derive(Debug, Deserialize)]
struct OrderBookResponse {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg")]
    ret_msg: String,
    result: Option<RawOrderBook>,
}

/// Raw order book payload: `s` symbol, `b`/`a` price-size string pairs
/// (best first), `ts` epoch millis
#[derive(Debug, Deserialize)]
struct RawOrderBook {
    s: String,
    b: Vec<[String; 2]>,
    a: Vec<[String; 2]>,
    ts: i64,
}

fn parse_levels(side: &str, raw: &[[String; 2]]) -> Result<Vec<BookLevel>> {
    raw.iter()
        .map(|[price, quantity]| {
            let price = Decimal::from_str(price)
                .map_err(|e| FeedError::Parse(format!("{side} price {price:?}: {e}")))?;
            let quantity = Decimal::from_str(quantity)
                .map_err(|e| FeedError::Parse(format!("{side} quantity {quantity:?}: {e}")))?;
            Ok(BookLevel::new(price, quantity))
        })
        .collect()
}

fn parse_order_book(raw: RawOrderBook) -> Result<OrderBookSnapshot> {
    let timestamp = Utc
        .timestamp_millis_opt(raw.ts)
        .single()
        .ok_or_else(|| FeedError::Parse(format!("timestamp {} out of range", raw.ts)))?;
    let bids = parse_levels("bid", &raw.b)?;
    let asks = parse_levels("ask", &raw.a)?;
    Ok(OrderBookSnapshot::new(raw.s, timestamp, bids, asks))
}

/// Mini client for the Bybit v5 REST API
pub struct BybitClient {
    http: reqwest::Client,
    host: &'static str,
}

impl BybitClient {
    /// Create a client against mainnet or testnet
    pub fn new(testnet: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        let host = if testnet { TESTNET_HOST } else { MAINNET_HOST };
        Ok(Self { http, host })
    }

    /// Fetch an L2 snapshot for `symbol` with up to `limit` levels per side
    pub async fn fetch_order_book(&self, symbol: &str, limit: usize) -> Result<OrderBookSnapshot> {
        let url = format!("{}/v5/market/orderbook", self.host);
        let limit = limit.to_string();
        let response: OrderBookResponse = self
            .http
            .get(&url)
            .query(&[
                ("category", "linear"),
                ("symbol", symbol),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        if response.ret_code != 0 {
            return Err(FeedError::Exchange(format!(
                "retCode {}: {}",
                response.ret_code, response.ret_msg
            )));
        }
        let raw = response
            .result
            .ok_or_else(|| FeedError::Parse("missing result payload".to_string()))?;
        parse_order_book(raw)
    }
}

/// Polling snapshot source over [`BybitClient`]
///
/// Sleeps `interval` between fetches. Transient failures and empty
/// payloads are logged and retried, matching the behavior of a patient
/// research poller; after [`MAX_CONSECUTIVE_FAILURES`] errors in a row the
/// source surfaces the problem instead of spinning forever.
pub struct BybitRestSource {
    client: BybitClient,
    symbol: String,
    limit: usize,
    interval: Duration,
}

impl BybitRestSource {
    pub fn new(client: BybitClient, symbol: impl Into<String>, limit: usize, interval: Duration) -> Self {
        let symbol = symbol.into();
        log::info!("Starting orderbook polling for {symbol} every {interval:?}");
        Self {
            client,
            symbol,
            limit,
            interval,
        }
    }
}

#[async_trait]
impl SnapshotSource for BybitRestSource {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn next_snapshot(&mut self) -> Result<Option<OrderBookSnapshot>> {
        let mut failures: u32 = 0;
        loop {
            tokio::time::sleep(self.interval).await;

            match self.client.fetch_order_book(&self.symbol, self.limit).await {
                Ok(snapshot) if !snapshot.is_two_sided() => {
                    log::warn!("[{}] one-sided or empty snapshot, skipping", self.symbol);
                }
                Ok(snapshot) => return Ok(Some(snapshot)),
                Err(err) => {
                    failures += 1;
                    if failures >= MAX_CONSECUTIVE_FAILURES {
                        return Err(FeedError::Exhausted(failures));
                    }
                    log::warn!(
                        "[{}] polling error ({failures}/{MAX_CONSECUTIVE_FAILURES}): {err}",
                        self.symbol
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "retCode": 0,
        "retMsg": "OK",
        "result": {
            "s": "ETHUSDT",
            "b": [["3000.50", "2.5"], ["3000.00", "3.2"]],
            "a": [["3001.00", "1.8"], ["3001.50", "2.3"]],
            "ts": 1672765737733,
            "u": 230704
        },
        "time": 1672765737734
    }"#;

    #[test]
    fn test_parse_sample_payload() {
        let response: OrderBookResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(response.ret_code, 0);

        let snapshot = parse_order_book(response.result.unwrap()).unwrap();
        assert_eq!(snapshot.symbol, "ETHUSDT");
        assert_eq!(snapshot.best_bid(), Some((dec!(3000.50), dec!(2.5))));
        assert_eq!(snapshot.best_ask(), Some((dec!(3001.00), dec!(1.8))));
        assert_eq!(snapshot.timestamp.timestamp_millis(), 1672765737733);
    }

    #[test]
    fn test_malformed_price_is_a_parse_error() {
        let raw = RawOrderBook {
            s: "ETHUSDT".to_string(),
            b: vec![["not-a-number".to_string(), "1.0".to_string()]],
            a: vec![],
            ts: 1672765737733,
        };
        let err = parse_order_book(raw).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn test_error_envelope() {
        let body = r#"{"retCode": 10001, "retMsg": "params error", "result": null}"#;
        let response: OrderBookResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.ret_code, 10001);
        assert!(response.result.is_none());
    }

    #[test]
    fn test_string_decimals_parse_exactly() {
        let levels = parse_levels("bid", &[["0.1".to_string(), "0.3".to_string()]]).unwrap();
        // Exact decimal, not a float approximation
        assert_eq!(levels[0].price, dec!(0.1));
        assert_eq!(levels[0].quantity, dec!(0.3));
    }
}
