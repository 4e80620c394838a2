//! JSON payloads of the market data endpoint.
//!
//! Requests carry an ordered list of logical symbols; responses carry one
//! `QuoteResult` per requested symbol in the same order, or an `ErrorBody`
//! when the whole batch fails.
use serde::{Deserialize, Serialize};

/// Body of `POST /api/market_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Logical symbols in caller order. Missing key means an empty list.
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl QuoteRequest {
    /// Build a request from anything that yields symbol strings.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

/// Normalized quote for one requested symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Logical symbol exactly as requested.
    pub symbol: String,
    /// Price rounded to two decimals; 0 when unobtainable.
    pub price: f64,
    /// Percent change against the previous close, rounded to two decimals.
    pub change: f64,
}

impl QuoteResult {
    /// Zero-valued result substituted for a symbol that could not be quoted.
    pub fn placeholder(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            price: 0.0,
            change: 0.0,
        }
    }

    /// True when this result carries no quote data.
    pub fn is_placeholder(&self) -> bool {
        self.price == 0.0 && self.change == 0.0
    }
}

/// Body returned with a 500 when the batch as a whole fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Name of the configured quote provider.
    pub provider: String,
}
