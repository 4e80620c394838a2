//! Command-line arguments for the relay client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::time::Duration;

use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the market data relay.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Path to a text file with symbols to request.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[arg(long)]
    pub path: Option<String>,

    /// Symbols given inline; repeat the flag or separate with commas.
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Seconds between polls. 0 requests once and exits.
    #[arg(long, default_value_t = 0)]
    pub interval_secs: u64,
}

impl Args {
    /// Poll interval, or `None` for a single request.
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}
