//! Offline quote provider producing a random walk per identifier.
//!
//! Each identifier starts at a seed price derived from its text, which also
//! serves as its previous close. Every fetch moves the last price by up to ±1%,
//! so consecutive requests observe a continuing series, the way a live feed
//! would. Useful for dashboard work without network access.
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::Rng;
use relay_common::Result;

use super::{ProviderQuote, QuoteBatch, QuoteProvider};

/// Lowest price the walk may reach.
const MIN_PRICE: f64 = 0.01;

struct Series {
    previous_close: f64,
    last: f64,
}

/// Random-walk quote source.
#[derive(Default)]
pub struct SyntheticProvider {
    series: Mutex<HashMap<String, Series>>,
}

impl SyntheticProvider {
    /// Create a provider with no series yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic starting price for `identifier`, between 100 and 5000.
    pub fn seed_price(identifier: &str) -> f64 {
        let sum: u32 = identifier.bytes().map(u32::from).sum();
        100.0 + f64::from(sum % 4900)
    }

    /// Next price of a small random walk around `current_price`.
    ///
    /// The change is sampled uniformly from `[-1%, +1%)` and the result is
    /// clamped to a minimum positive value.
    pub fn next_price(current_price: f64) -> f64 {
        let mut rng = rand::rng();
        let change: f64 = rng.random_range(-0.01..0.01);
        (current_price * (1.0 + change)).max(MIN_PRICE)
    }
}

#[async_trait]
impl QuoteProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch_quotes(&self, identifiers: &[String]) -> Result<QuoteBatch> {
        let mut series = self.series.lock()?;
        let mut batch = QuoteBatch::default();

        for identifier in identifiers {
            if batch.get(identifier).is_some() {
                continue;
            }
            let entry = series.entry(identifier.clone()).or_insert_with(|| {
                let seed = Self::seed_price(identifier);
                Series {
                    previous_close: seed,
                    last: seed,
                }
            });
            entry.last = Self::next_price(entry.last);

            batch.insert_quote(
                identifier.as_str(),
                ProviderQuote {
                    current_price: Some(entry.last),
                    regular_market_price: Some(entry.last),
                    previous_close: Some(entry.previous_close),
                },
            );
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_price_stays_within_one_percent() {
        for _ in 0..1000 {
            let next = SyntheticProvider::next_price(100.0);
            assert!((99.0..=101.0).contains(&next), "unexpected price {}", next);
        }
    }

    #[test]
    fn test_next_price_is_floored() {
        assert!(SyntheticProvider::next_price(0.0) >= MIN_PRICE);
    }

    #[test]
    fn test_seed_price_is_deterministic() {
        assert_eq!(
            SyntheticProvider::seed_price("^NSEI"),
            SyntheticProvider::seed_price("^NSEI")
        );
        let seed = SyntheticProvider::seed_price("KOTAKBANK.NS");
        assert!((100.0..5000.0).contains(&seed));
    }

    #[tokio::test]
    async fn test_series_continues_across_fetches() {
        let provider = SyntheticProvider::new();
        let ids = vec!["^NSEI".to_string(), "^NSEI".to_string(), "ZEEL.NS".to_string()];

        let first = provider.fetch_quotes(&ids).await.unwrap();
        let second = provider.fetch_quotes(&ids).await.unwrap();

        assert_eq!(first.len(), 2);
        let first_quote = first.get("^NSEI").unwrap();
        let second_quote = second.get("^NSEI").unwrap();
        assert_eq!(first_quote.previous_close, second_quote.previous_close);
        assert_eq!(
            first_quote.previous_close,
            Some(SyntheticProvider::seed_price("^NSEI"))
        );
        let moved = (second_quote.current_price.unwrap() / first_quote.current_price.unwrap() - 1.0).abs();
        assert!(moved <= 0.01);
    }
}
