//! Requesting quotes from the relay over HTTP.
//!
//! A thin blocking wrapper around `POST /api/market_data` that decodes either
//! the result array or the `{"error": ...}` body of a failed batch.
use std::time::Duration;

use log::debug;
use relay_common::model::ErrorBody;
use relay_common::net::{MARKET_DATA_PATH, endpoint};
use relay_common::{QuoteRequest, QuoteResult, RelayError, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;

/// Request timeout; generous because the relay itself waits on the provider.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Blocking client for the market data endpoint.
pub struct QuoteFetcher {
    client: Client,
    url: String,
}

impl QuoteFetcher {
    /// Create a fetcher for the relay at `server_url`.
    pub fn new(server_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: endpoint(server_url, MARKET_DATA_PATH),
        })
    }

    /// Endpoint this fetcher posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request quotes for `symbols`.
    pub fn fetch(&self, symbols: &[String]) -> Result<Vec<QuoteResult>> {
        let request = QuoteRequest::new(symbols.iter().cloned());
        debug!("POST {} {:?}", self.url, request.symbols);

        let response = self.client.post(&self.url).json(&request).send()?;
        let status = response.status();
        let body = response.bytes()?;
        decode_response(status, &body)
    }
}

/// Decode a relay response body according to its status.
pub fn decode_response(status: StatusCode, body: &[u8]) -> Result<Vec<QuoteResult>> {
    if status.is_success() {
        return Ok(serde_json::from_slice(body)?);
    }
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(error) => Err(RelayError::Remote(error.error)),
        Err(_) => Err(RelayError::Format(format!(
            "relay answered {}: {}",
            status,
            String::from_utf8_lossy(body)
        ))),
    }
}
