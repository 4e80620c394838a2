//! Market data relay binary.
//!
//! Parses `ServerConfig`, loads the symbol map, builds the configured quote
//! provider and serves the `axum` router until Ctrl+C.
//!
//! Usage example:
//! ```bash
//! RUST_LOG=debug relay_server --port 5000 --provider yahoo
//! curl -X POST localhost:5000/api/market_data -d '{"symbols": ["NIFTY50", "KOTAK"]}'
//! ```
use std::sync::Arc;

use clap::Parser;
use log::info;
use relay_common::Result;
use relay_common::net::MARKET_DATA_PATH;
use relay_server::provider::build_provider;
use relay_server::{AppState, QuoteAggregator, ServerConfig, create_router};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let config = ServerConfig::parse();

    let symbols = Arc::new(config.load_symbol_map()?);
    info!(
        "Symbol map ready: {} entries, unmapped symbols use {} ({})",
        symbols.len(),
        symbols.fallback(),
        symbols.fallback().suffix()
    );

    let provider = build_provider(&config)?;
    let aggregator = QuoteAggregator::new(symbols, provider, config.provider_timeout());
    let app = create_router(AppState::new(aggregator));

    let listener = TcpListener::bind(config.bind_address()?).await?;
    info!(
        "Market data relay ({} provider) listening on http://{}{}",
        config.provider,
        listener.local_addr()?,
        MARKET_DATA_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl+C received. Shutting down server...");
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
