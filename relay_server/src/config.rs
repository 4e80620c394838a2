//! Server configuration.
//!
//! Every option is a command line flag with an environment variable fallback,
//! so the relay can be started bare (`relay_server`) or configured from a
//! container environment.
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::info;
use relay_common::net::{DEFAULT_HOST, DEFAULT_PORT, addr};
use relay_common::{Exchange, RelayError, Result, SymbolMap};
use strum::Display;

/// Public Yahoo Finance API host.
pub const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com";
/// Upper bound on one provider batch call.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
/// Share of the batch bound, in quarters, granted to a single HTTP request.
/// It stays below the batch bound so a slow identifier times out on its own
/// before the whole batch is abandoned.
const REQUEST_TIMEOUT_QUARTERS: u32 = 3;

/// Quote source backing the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// Yahoo Finance chart API over HTTPS.
    Yahoo,
    /// Offline random-walk quotes.
    Synthetic,
}

/// Parsed server configuration.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "HTTP relay for batched market quotes", long_about = None)]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "RELAY_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// HTTP port to listen on.
    #[arg(long, env = "RELAY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Quote provider implementation.
    #[arg(long, env = "RELAY_PROVIDER", value_enum, default_value_t = ProviderKind::Yahoo)]
    pub provider: ProviderKind,

    /// Base URL of the Yahoo Finance API.
    #[arg(long, env = "RELAY_PROVIDER_URL", default_value = DEFAULT_PROVIDER_URL)]
    pub provider_url: String,

    /// Seconds before a provider batch call is abandoned.
    #[arg(
        long,
        env = "RELAY_PROVIDER_TIMEOUT_SECS",
        default_value_t = DEFAULT_PROVIDER_TIMEOUT_SECS
    )]
    pub provider_timeout_secs: u64,

    /// Exchange whose suffix is appended to symbols missing from the map.
    #[arg(long, env = "RELAY_DEFAULT_EXCHANGE", value_enum, default_value_t = Exchange::Nse)]
    pub default_exchange: Exchange,

    /// File of `LOGICAL = PROVIDER` lines merged over the built-in symbol map.
    #[arg(long, env = "RELAY_SYMBOL_MAP")]
    pub symbol_map: Option<PathBuf>,
}

impl ServerConfig {
    /// Socket address built from `host` and `port`.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        Ok(addr(&self.host, self.port).parse()?)
    }

    /// Provider timeout as a `Duration`.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Timeout for one HTTP request issued by the provider, strictly below
    /// [`provider_timeout`](Self::provider_timeout) for any non-zero bound.
    pub fn provider_request_timeout(&self) -> Duration {
        self.provider_timeout() * REQUEST_TIMEOUT_QUARTERS / 4
    }

    /// Built-in symbol map, with the optional override file merged in.
    pub fn load_symbol_map(&self) -> Result<SymbolMap> {
        let mut symbols = SymbolMap::new(self.default_exchange);
        if let Some(path) = &self.symbol_map {
            let file = File::open(path).map_err(|e| {
                RelayError::ParseSymbolFile(format!("cannot open {}: {}", path.display(), e))
            })?;
            let count = symbols.extend_from_file(BufReader::new(file))?;
            info!("Loaded {} symbol override(s) from {}", count, path.display());
        }
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["relay_server"]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.provider, ProviderKind::Yahoo);
        assert_eq!(config.default_exchange, Exchange::Nse);
        assert_eq!(config.provider_timeout(), Duration::from_secs(10));
        assert_eq!(config.provider_request_timeout(), Duration::from_millis(7500));
        assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:5000");
        assert!(config.symbol_map.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "relay_server",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--provider",
            "synthetic",
            "--default-exchange",
            "bse",
            "--provider-timeout-secs",
            "3",
        ])
        .unwrap();
        assert_eq!(config.bind_address().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.provider, ProviderKind::Synthetic);
        assert_eq!(config.default_exchange, Exchange::Bse);
        assert_eq!(config.provider_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_request_timeout_is_below_batch_timeout() {
        for secs in ["1", "3", "10", "60"] {
            let config =
                ServerConfig::try_parse_from(["relay_server", "--provider-timeout-secs", secs]).unwrap();
            assert!(config.provider_request_timeout() < config.provider_timeout());
            assert!(!config.provider_request_timeout().is_zero());
        }
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(ServerConfig::try_parse_from(["relay_server", "--provider", "bloomberg"]).is_err());
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = ServerConfig::try_parse_from(["relay_server", "--host", "not a host"]).unwrap();
        assert!(matches!(config.bind_address(), Err(RelayError::AddrParse(_))));
    }

    #[test]
    fn test_load_symbol_map_with_overrides() {
        let path = std::env::temp_dir().join(format!("relay-symbols-{}.txt", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "KOTAK = KOTAKBANK.BO").unwrap();
        }
        let config = ServerConfig::try_parse_from([
            "relay_server",
            "--symbol-map",
            path.to_str().unwrap(),
        ])
        .unwrap();

        let symbols = config.load_symbol_map().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(symbols.resolve("KOTAK"), "KOTAKBANK.BO");
        assert_eq!(symbols.resolve("NIFTY50"), "^NSEI");
    }

    #[test]
    fn test_missing_symbol_map_file_is_an_error() {
        let config = ServerConfig::try_parse_from([
            "relay_server",
            "--symbol-map",
            "/nonexistent/relay-symbols.txt",
        ])
        .unwrap();
        assert!(matches!(config.load_symbol_map(), Err(RelayError::ParseSymbolFile(_))));
    }
}
