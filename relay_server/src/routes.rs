//! HTTP surface of the relay.
//!
//! - `POST /api/market_data` — batched quotes, see `QuoteAggregator`.
//! - `GET /health` — liveness and provider name.
//!
//! All origins are allowed. Every request is logged with its status and
//! latency. A batch-level failure is answered with `{"error": ...}` and a 500.
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use relay_common::model::{ErrorBody, HealthStatus};
use relay_common::net::{HEALTH_PATH, MARKET_DATA_PATH};
use relay_common::{QuoteRequest, QuoteResult, RelayError, Result};
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::QuoteAggregator;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<QuoteAggregator>,
}

impl AppState {
    /// Wrap an aggregator for sharing across requests.
    pub fn new(aggregator: QuoteAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

/// Batch-level failure rendered as a 500 with an `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Market data request failed: {}", self.0);
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Build the router with CORS and request logging applied.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(MARKET_DATA_PATH, post(market_data))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
}

/// Decode a request body. Anything other than a JSON object whose optional
/// `symbols` key is an array of strings is rejected.
pub fn parse_request(body: &[u8]) -> Result<QuoteRequest> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(RelayError::Format(
            "request body must be a JSON object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

async fn market_data(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<Vec<QuoteResult>>, ApiError> {
    let request = parse_request(&body)?;
    info!("Quotes requested for {} symbol(s)", request.symbols.len());

    let results = state.aggregator.get_quotes(&request.symbols).await?;
    Ok(Json(results))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        provider: state.aggregator.provider_name().to_string(),
    })
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
