//! Feed errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Exchange rejected the request: {0}")]
    Exchange(String),

    #[error("Failed to parse order book payload: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Capture decode error: {0}")]
    Capture(#[from] serde_json::Error),

    #[error("Giving up after {0} consecutive poll failures")]
    Exhausted(u32),
}

pub type Result<T> = std::result::Result<T, FeedError>;
