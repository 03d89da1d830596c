//! Error types shared by the API client and the config loader.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for calls against the vocabulary API.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failures of a single request/response exchange.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status {
        status: u16,
        /// The `error` field of the response body, when there was one.
        message: Option<String>,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
