//! Relay Client — requests quotes from the market data relay and prints them.
//!
//! Symbols come from a text file (`--path`), from `--symbols`, or both. With
//! `--interval-secs` the client keeps polling, the way a dashboard refreshes,
//! until Ctrl+C.
//!
//! Usage example (CLI):
//! ```bash
//! relay_client --server-url http://192.168.0.10:5000 --path ./watchlist.txt --interval-secs 5
//! ```
//!
//! The symbol file should contain symbols separated by commas, spaces, or new lines.
//! See `relay_common::symbols` for details.
#![warn(missing_docs)]
mod args;
mod fetcher;

use crate::args::Args;
use crate::fetcher::QuoteFetcher;
use chrono::Local;
use clap::Parser;
use log::{error, info, warn};
use relay_common::symbols::parse_symbol_list;
use relay_common::{QuoteResult, RelayError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity at which the poll loop checks for Ctrl+C while waiting.
const SHUTDOWN_CHECK_MS: u64 = 200;

fn main() -> Result<(), RelayError> {
    init_logger();
    let args = Args::parse();

    let symbols = collect_symbols(&args)?;
    if symbols.is_empty() {
        warn!("No symbols given; pass --path or --symbols. The relay will answer with an empty list.");
    }
    info!("Symbols: {:?}", symbols);

    let fetcher = QuoteFetcher::new(&args.server_url)?;
    info!("Requesting quotes from {}", fetcher.url());

    match args.interval() {
        None => {
            let results = fetcher.fetch(&symbols)?;
            print_quotes(&results);
            Ok(())
        }
        Some(interval) => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let shutdown = shutdown.clone();
                ctrlc::set_handler(move || {
                    info!("Ctrl+C received. Shutting down client...");
                    shutdown.store(true, Ordering::SeqCst);
                })
                .map_err(|e| RelayError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
            }
            info!("Client is running. Press Ctrl+C to exit.");
            poll_loop(&fetcher, &symbols, interval, &shutdown);
            Ok(())
        }
    }
}

/// Request quotes every `interval` until `shutdown` is raised. Failed polls are
/// logged and retried on the next tick.
fn poll_loop(fetcher: &QuoteFetcher, symbols: &[String], interval: Duration, shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::Relaxed) {
        let started = Instant::now();
        match fetcher.fetch(symbols) {
            Ok(results) => print_quotes(&results),
            Err(e) => error!("Quote request failed: {}", e),
        }

        while started.elapsed() < interval && !shutdown.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(SHUTDOWN_CHECK_MS));
        }
    }
    info!("Poll loop stopping...");
}

fn print_quotes(results: &[QuoteResult]) {
    let time = Local::now().format("%Y-%m-%d %H:%M:%S");
    for quote in results {
        if quote.is_placeholder() {
            warn!("QUOTE: {} unavailable Time={}", quote.symbol, time);
        } else {
            info!(
                "QUOTE: {} Price={:.2} Change={:+.2}% Time={}",
                quote.symbol, quote.price, quote.change, time
            );
        }
    }
}

/// Symbols from `--path` followed by those from `--symbols`.
fn collect_symbols(args: &Args) -> Result<Vec<String>, RelayError> {
    let mut symbols = Vec::new();

    if let Some(raw) = &args.path {
        let file_path = normalize_path(raw);
        if !is_file_exist(&file_path) {
            return Err(RelayError::ParseSymbolFile(format!(
                "{} is not a readable file",
                file_path.display()
            )));
        }
        let file = File::open(&file_path)?;
        symbols.extend(parse_symbol_list(BufReader::new(file))?);
    }

    symbols.extend(
        args.symbols
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    );
    Ok(symbols)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &Path) -> bool {
    path.exists() && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_path_strips_quotes() {
        assert_eq!(normalize_path(" \"C:\\lists\\nse.txt\" "), PathBuf::from("C:\\lists\\nse.txt"));
        assert_eq!(normalize_path("./watchlist.txt"), PathBuf::from("./watchlist.txt"));
    }

    #[test]
    fn test_collect_symbols_file_then_inline() {
        let path = std::env::temp_dir().join(format!("relay-watchlist-{}.txt", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "NIFTY50, SENSEX").unwrap();
            writeln!(file, "KOTAK").unwrap();
        }
        let args = Args::try_parse_from([
            "relay_client",
            "--path",
            path.to_str().unwrap(),
            "--symbols",
            "ZEEL, ",
        ])
        .unwrap();

        let symbols = collect_symbols(&args).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(symbols, vec!["NIFTY50", "SENSEX", "KOTAK", "ZEEL"]);
    }

    #[test]
    fn test_collect_symbols_missing_file() {
        let args = Args::try_parse_from(["relay_client", "--path", "/nonexistent/watchlist.txt"]).unwrap();
        assert!(matches!(collect_symbols(&args), Err(RelayError::ParseSymbolFile(_))));
    }
}
