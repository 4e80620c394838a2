//! Quote aggregation with per-symbol fault isolation.
//!
//! `QuoteAggregator::get_quotes` is the whole request pipeline:
//!
//! 1. resolve each logical symbol through the `SymbolMap`;
//! 2. ask the provider for the batch of identifiers, bounded by a timeout;
//! 3. turn each symbol's provider fields into a `QuoteResult`.
//!
//! Step 3 runs per symbol. Any failure there becomes a `SymbolError`, is logged
//! for the operator, and is replaced by a zero placeholder, so the output always
//! has one entry per requested symbol in request order. Only failures of steps
//! 1–2 (the provider batch call erroring or timing out) fail the request.
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use relay_common::{QuoteResult, RelayError, Result, SymbolMap};
use thiserror::Error;

use crate::provider::{ProviderQuote, QuoteBatch, QuoteProvider};

/// Why a single symbol degraded to a placeholder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    /// The provider returned nothing for the identifier.
    #[error("no quote returned for {0}")]
    Missing(String),

    /// The provider reported a failure for the identifier.
    #[error("{identifier}: {reason}")]
    Provider {
        /// Provider identifier.
        identifier: String,
        /// Provider-supplied reason.
        reason: String,
    },

    /// None of the price fields holds a usable value.
    #[error("no usable price for {0}")]
    NoPrice(String),

    /// The percent change could not be computed as a finite number.
    #[error("cannot compute change for {0}")]
    InvalidChange(String),

    /// Price or change does not survive rounding as a finite number.
    #[error("quote for {0} is out of range")]
    OutOfRange(String),
}

/// Resolves, fetches and assembles quotes for a batch of logical symbols.
pub struct QuoteAggregator {
    symbols: Arc<SymbolMap>,
    provider: Arc<dyn QuoteProvider>,
    timeout: Duration,
}

impl QuoteAggregator {
    /// Create an aggregator over a read-only symbol map and a provider.
    pub fn new(symbols: Arc<SymbolMap>, provider: Arc<dyn QuoteProvider>, timeout: Duration) -> Self {
        Self {
            symbols,
            provider,
            timeout,
        }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Provider identifier for a logical symbol.
    pub fn resolve(&self, symbol: &str) -> String {
        self.symbols.resolve(symbol)
    }

    /// One `QuoteResult` per entry of `symbols`, in the same order.
    ///
    /// Returns `Err` only when the provider batch call itself fails or exceeds
    /// the timeout.
    pub async fn get_quotes(&self, symbols: &[String]) -> Result<Vec<QuoteResult>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let identifiers: Vec<String> = symbols.iter().map(|s| self.resolve(s)).collect();
        debug!("Resolved {:?} -> {:?}", symbols, identifiers);

        let batch = tokio::time::timeout(self.timeout, self.provider.fetch_quotes(&identifiers))
            .await
            .map_err(|_| RelayError::Timeout(self.timeout))??;

        Ok(symbols
            .iter()
            .zip(&identifiers)
            .map(|(symbol, identifier)| {
                quote_for_symbol(symbol, identifier, &batch).unwrap_or_else(|e| {
                    warn!("Error fetching {} ({}): {}", symbol, identifier, e);
                    QuoteResult::placeholder(symbol)
                })
            })
            .collect())
    }
}

/// Look up `identifier` in `batch` and compute the result for `symbol`.
pub fn quote_for_symbol(
    symbol: &str,
    identifier: &str,
    batch: &QuoteBatch,
) -> std::result::Result<QuoteResult, SymbolError> {
    match batch.get(identifier) {
        Some(quote) => compute_quote(symbol, identifier, quote),
        None => Err(match batch.failure(identifier) {
            Some(reason) => SymbolError::Provider {
                identifier: identifier.to_string(),
                reason: reason.to_string(),
            },
            None => SymbolError::Missing(identifier.to_string()),
        }),
    }
}

/// Price and percent change for one symbol.
///
/// Price is the first usable value of current price, regular-market price and
/// previous close. The baseline is the previous close when usable, otherwise
/// the price itself, which pins the change at 0.
pub fn compute_quote(
    symbol: &str,
    identifier: &str,
    quote: &ProviderQuote,
) -> std::result::Result<QuoteResult, SymbolError> {
    let price = [
        quote.current_price,
        quote.regular_market_price,
        quote.previous_close,
    ]
    .into_iter()
    .flatten()
    .find(|value| is_usable(*value))
    .ok_or_else(|| SymbolError::NoPrice(identifier.to_string()))?;

    let previous_close = quote.previous_close.filter(|value| is_usable(*value)).unwrap_or(price);
    let change = percent_change(price, previous_close)
        .ok_or_else(|| SymbolError::InvalidChange(identifier.to_string()))?;

    let (price, change) = (round2(price), round2(change));
    if !(price.is_finite() && change.is_finite()) {
        return Err(SymbolError::OutOfRange(identifier.to_string()));
    }

    Ok(QuoteResult {
        symbol: symbol.to_string(),
        price,
        change,
    })
}

/// `(price - previous_close) / previous_close * 100`, or `None` when the result
/// is not finite.
pub fn percent_change(price: f64, previous_close: f64) -> Option<f64> {
    if previous_close == 0.0 {
        return None;
    }
    let change = (price - previous_close) / previous_close * 100.0;
    change.is_finite().then_some(change)
}

/// Round to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Zero counts as missing so that it falls through to the next field.
fn is_usable(value: f64) -> bool {
    value.is_finite() && value != 0.0
}
