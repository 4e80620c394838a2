//!
//! Common types and utilities shared by the market data relay server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `RelayError` used across the workspace.
//! - `result` — handy `Result<T, RelayError>` alias.
//! - `exchange` — exchange suffixes applied to unmapped symbols.
//! - `symbols` — logical symbol to provider identifier mapping and file parsers.
//! - `model` — JSON payloads exchanged over `POST /api/market_data`.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod exchange;
pub mod model;
pub mod net;
pub mod result;
pub mod symbols;

pub use error::RelayError;
pub use exchange::Exchange;
pub use model::{QuoteRequest, QuoteResult};
pub use result::Result;
pub use symbols::SymbolMap;
