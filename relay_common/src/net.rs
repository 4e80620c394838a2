//! Shared networking constants and helpers used by client and server.

/// Default interface the relay binds to.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default HTTP port of the relay.
pub const DEFAULT_PORT: u16 = 5000;
/// Route serving batched quotes.
pub const MARKET_DATA_PATH: &str = "/api/market_data";
/// Liveness route.
pub const HEALTH_PATH: &str = "/health";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Join a base URL and a route without doubling the slash between them.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("http://127.0.0.1:5000/", MARKET_DATA_PATH),
            "http://127.0.0.1:5000/api/market_data"
        );
        assert_eq!(endpoint("http://localhost:5000", HEALTH_PATH), "http://localhost:5000/health");
    }

    #[test]
    fn test_addr() {
        assert_eq!(addr(DEFAULT_HOST, DEFAULT_PORT), "127.0.0.1:5000");
    }
}
