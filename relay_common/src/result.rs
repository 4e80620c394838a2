//! Result type alias shared across the workspace.
//!
//! Defaults the error type to the common `RelayError`, so functions can simply
//! return `Result<T>`.
use crate::error::RelayError;

/// Workspace-wide `Result` alias with `RelayError` as the default error.
pub type Result<T, E = RelayError> = std::result::Result<T, E>;
