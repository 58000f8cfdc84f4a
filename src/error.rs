//! Error types for Wardgate

use std::time::Duration;
use thiserror::Error;

/// Result type alias for Wardgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

/// Errors produced by a cached fetch.
///
/// Cloneable because every caller joined onto one in-flight request
/// receives its own copy of the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Request was cancelled before it settled")]
    Cancelled,
}

impl ApiError {
    /// True for a completed exchange with a non-success status
    pub fn is_http(&self) -> bool {
        matches!(self, ApiError::Http { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Transport("Failed to connect to API".to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Legacy menu snapshot could not be understood.
///
/// Absorbed by the permission resolver and turned into a denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Malformed menu snapshot: {0}")]
    Malformed(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `wardgate status` to see the expected path.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("API base URL not configured. Set `api_base_url` in the config file.")]
    MissingApiBaseUrl,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Persisted session snapshot errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to parse session snapshot: {0}")]
    ParseError(String),

    #[error("Session storage error: {0}")]
    Io(String),
}
