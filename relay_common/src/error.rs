//! Error types shared between client and server.
//!
//! `RelayError` covers every failure that aborts a whole request or a whole
//! process: I/O, configuration, JSON payloads, the quote provider and the HTTP
//! client. Failures that only affect one symbol inside a batch never become a
//! `RelayError`; the server degrades them to a zero placeholder instead.
use std::io;
use std::net::AddrParseError;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum RelayError {
    /// I/O error originating from the standard library, sockets or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing a symbol map or symbol list file.
    #[error("Parse symbol file error: {0}")]
    ParseSymbolFile(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The quote provider could not serve the batch.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The relay answered with an `{"error": ...}` body.
    #[error("Relay error: {0}")]
    Remote(String),

    /// Transport-level failure in the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The quote provider did not answer within the configured bound.
    #[error("Provider call timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A bind or connect address could not be parsed.
    #[error("Invalid address: {0}")]
    AddrParse(#[from] AddrParseError),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for RelayError {
    fn from(err: PoisonError<T>) -> Self {
        RelayError::MutexLock(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_poisoned_lock_converts_to_mutex_error() {
        let lock = Arc::new(Mutex::new(0));
        let cloned = Arc::clone(&lock);
        let _ = std::thread::spawn(move || {
            let _guard = cloned.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err: RelayError = lock.lock().unwrap_err().into();
        assert!(matches!(err, RelayError::MutexLock(_)));
    }

    #[test]
    fn test_messages_are_human_readable() {
        let err = RelayError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Provider call timed out after 10s");

        let err = RelayError::Provider("upstream unavailable".to_string());
        assert_eq!(err.to_string(), "Provider error: upstream unavailable");
    }
}
