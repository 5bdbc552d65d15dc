//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for Splashify
//!
//! Every fallible operation in the crate returns `Result<T, AppError>`. The
//! three network classes (`Transport`, `Status`, `Decode`) are the ones the
//! fetch-cycle boundary swallows; the remaining variants are startup or
//! terminal failures that reach the binary edge.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all Splashify operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Connection, TLS, timeout or body-read failure from the HTTP client.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status (rate limit, bad credential, ...).
    #[error("API returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected JSON shape.
    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// No access key was configured.
    #[error("Missing API access key: set UNSPLASH_ACCESS_KEY or api.access_key in {0:?}")]
    MissingCredential(PathBuf),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a non-2xx status error, truncating the body for log hygiene.
    pub fn status<S: Into<String>>(endpoint: S, status: u16, body: &str) -> Self {
        const MAX_BODY: usize = 256;

        let body = match body.char_indices().nth(MAX_BODY) {
            Some((cut, _)) => format!("{}…", &body[..cut]),
            None => body.to_string(),
        };

        Self::Status {
            endpoint: endpoint.into(),
            status,
            body,
        }
    }

    /// Create a decode error for a response body.
    pub fn decode<S: Into<String>>(endpoint: S, source: serde_json::Error) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// True for the failure classes a fetch cycle absorbs as a no-op.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Decode { .. }
        )
    }

    /// Short, single-line description for the status bar.
    #[must_use]
    pub fn short(&self) -> String {
        match self {
            Self::Transport(e) if e.is_timeout() => "request timed out".into(),
            Self::Transport(_) => "network unreachable".into(),
            Self::Status { status: 401, .. } => "invalid access key (401)".into(),
            Self::Status { status: 403, .. } => "rate limited (403)".into(),
            Self::Status { status, .. } => format!("API error ({status})"),
            Self::Decode { .. } => "unexpected response".into(),
            other => other.to_string(),
        }
    }
}
