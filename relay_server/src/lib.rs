//! Market data relay server.
//!
//! Hosts `POST /api/market_data`, which turns a list of logical symbols into
//! normalized price/percent-change pairs. The building blocks are:
//!
//! - `config` — command line and environment configuration.
//! - `provider` — the `QuoteProvider` seam and its Yahoo Finance and synthetic
//!   implementations.
//! - `aggregator` — symbol resolution, one batched provider call, and per-symbol
//!   fault-isolated assembly of results.
//! - `routes` — the `axum` router, request logging and error responses.
#![warn(missing_docs)]
pub mod aggregator;
pub mod config;
pub mod provider;
pub mod routes;

pub use aggregator::QuoteAggregator;
pub use config::ServerConfig;
pub use routes::{AppState, create_router};
