//! Quote providers.
//!
//! A provider answers one question: given a batch of provider identifiers,
//! which quote fields are known for each? Identifiers the provider could not
//! serve are reported individually so the aggregator can degrade them one by
//! one; only a failure to run the batch at all is returned as an `Err`.
//!
//! - `yahoo` — Yahoo Finance chart API over HTTPS.
//! - `synthetic` — offline random-walk quotes for demos and local work.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use relay_common::Result;

use crate::config::{ProviderKind, ServerConfig};

pub mod synthetic;
pub mod yahoo;

pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;

/// Raw quote fields reported for one provider identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProviderQuote {
    /// Live price, when the provider has one.
    pub current_price: Option<f64>,
    /// Regular session price.
    pub regular_market_price: Option<f64>,
    /// Close of the previous session.
    pub previous_close: Option<f64>,
}

/// Outcome of one batch call, keyed by provider identifier.
#[derive(Debug, Clone, Default)]
pub struct QuoteBatch {
    quotes: HashMap<String, ProviderQuote>,
    failures: HashMap<String, String>,
}

impl QuoteBatch {
    /// Record quote fields for `identifier`.
    pub fn insert_quote(&mut self, identifier: impl Into<String>, quote: ProviderQuote) {
        self.quotes.insert(identifier.into(), quote);
    }

    /// Record why `identifier` could not be served.
    pub fn insert_failure(&mut self, identifier: impl Into<String>, reason: impl Into<String>) {
        self.failures.insert(identifier.into(), reason.into());
    }

    /// Quote fields for `identifier`, if any were returned.
    pub fn get(&self, identifier: &str) -> Option<&ProviderQuote> {
        self.quotes.get(identifier)
    }

    /// Failure reason for `identifier`, if the provider reported one.
    pub fn failure(&self, identifier: &str) -> Option<&str> {
        self.failures.get(identifier).map(String::as_str)
    }

    /// Number of identifiers with quote data.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// True when no identifier has quote data.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Batch quote lookup capability.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Short name reported by the health endpoint.
    fn name(&self) -> &'static str;

    /// Fetch quote fields for every identifier in `identifiers`.
    ///
    /// Duplicates may appear; a provider answers each distinct identifier once.
    async fn fetch_quotes(&self, identifiers: &[String]) -> Result<QuoteBatch>;
}

/// Build the provider selected in `config`.
pub fn build_provider(config: &ServerConfig) -> Result<Arc<dyn QuoteProvider>> {
    let provider: Arc<dyn QuoteProvider> = match config.provider {
        ProviderKind::Yahoo => Arc::new(YahooProvider::new(
            &config.provider_url,
            config.provider_request_timeout(),
        )?),
        ProviderKind::Synthetic => Arc::new(SyntheticProvider::new()),
    };
    info!("Using {} quote provider", provider.name());
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_batch_lookup() {
        let mut batch = QuoteBatch::default();
        batch.insert_quote(
            "^NSEI",
            ProviderQuote {
                regular_market_price: Some(24000.55),
                ..Default::default()
            },
        );
        batch.insert_failure("UNKNOWNX.NS", "Not Found");

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.get("^NSEI").and_then(|q| q.regular_market_price), Some(24000.55));
        assert_eq!(batch.failure("UNKNOWNX.NS"), Some("Not Found"));
        assert!(batch.get("UNKNOWNX.NS").is_none());
        assert!(batch.failure("^NSEI").is_none());
    }

    #[test]
    fn test_build_provider_follows_config() {
        let config = ServerConfig::try_parse_from(["relay_server", "--provider", "synthetic"]).unwrap();
        assert_eq!(build_provider(&config).unwrap().name(), "synthetic");

        let config = ServerConfig::try_parse_from(["relay_server"]).unwrap();
        assert_eq!(build_provider(&config).unwrap().name(), "yahoo");
    }
}
