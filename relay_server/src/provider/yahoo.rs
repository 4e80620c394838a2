//! Yahoo Finance quote provider.
//!
//! Quotes come from the chart endpoint
//! `GET {base}/v8/finance/chart/{identifier}?range=1d&interval=1d`, whose
//! `chart.result[0].meta` block carries the regular-market price and the
//! previous close. Distinct identifiers of a batch are requested concurrently;
//! a 404, a `chart.error` payload or a transport failure for one identifier is
//! recorded against that identifier only.
use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use log::debug;
use relay_common::{RelayError, Result};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{ProviderQuote, QuoteBatch, QuoteProvider};

/// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Quote provider backed by the Yahoo Finance chart API.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// Create a provider talking to `base_url`, with `timeout` applied to every
    /// HTTP request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Chart URL for one identifier. The identifier is percent-encoded as a
    /// single path segment.
    pub fn chart_url(&self, identifier: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RelayError::Provider(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| RelayError::Provider(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", identifier]);
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");
        Ok(url)
    }

    async fn fetch_one(&self, url: Url) -> Result<ProviderQuote> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<ChartEnvelope>(&body) {
            Ok(envelope) => quote_from_chart(envelope),
            Err(_) if !status.is_success() => Err(RelayError::Provider(format!("HTTP {}", status))),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_quotes(&self, identifiers: &[String]) -> Result<QuoteBatch> {
        let mut seen = HashSet::new();
        let requests = identifiers
            .iter()
            .filter(|identifier| seen.insert(*identifier))
            .map(|identifier| self.chart_url(identifier).map(|url| (identifier, url)))
            .collect::<Result<Vec<_>>>()?;

        debug!("Requesting {} chart(s) from {}", requests.len(), self.base_url);
        let responses = join_all(
            requests
                .into_iter()
                .map(|(identifier, url)| async move { (identifier, self.fetch_one(url).await) }),
        )
        .await;

        let mut batch = QuoteBatch::default();
        for (identifier, outcome) in responses {
            match outcome {
                Ok(quote) => batch.insert_quote(identifier.as_str(), quote),
                Err(e) => {
                    debug!("Chart request for {} failed: {}", identifier, e);
                    batch.insert_failure(identifier.as_str(), e.to_string());
                }
            }
        }
        Ok(batch)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    current_price: Option<f64>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

fn quote_from_chart(envelope: ChartEnvelope) -> Result<ProviderQuote> {
    let chart = envelope.chart;
    if let Some(error) = chart.error {
        return Err(RelayError::Provider(format!("{}: {}", error.code, error.description)));
    }

    let meta = chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| result.meta)
        .ok_or_else(|| RelayError::Provider("empty chart result".to_string()))?;

    Ok(ProviderQuote {
        current_price: meta.current_price,
        regular_market_price: meta.regular_market_price,
        previous_close: meta.previous_close.or(meta.chart_previous_close),
    })
}
