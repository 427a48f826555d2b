//! Crate-wide error hierarchy for mr-reviewer.
//!
//! Goals:
//! - Single root `Error` for internal fallible functions.
//! - Provider-aware mapping (401→Unauthorized, 404→NotFound, 5xx→Server, timeout),
//!   keeping the response body snippet for logs.
//! - The public GitLab client converts these into sentinels at its boundary;
//!   they never reach the webhook handler.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type MrResult<T> = Result<T, Error>;

/// Root error type for the mr-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// GitLab transport/status/decode failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Configuration problems (bad/missing token, base URL).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Transport-level failure of a single GitLab call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401). Carries the response body snippet.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (HTTP 403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Gateway/Server error (HTTP 5xx).
    #[error("server error: status {status}: {snippet}")]
    Server { status: u16, snippet: String },

    /// Other non-success HTTP status.
    #[error("http status error: {status}: {snippet}")]
    HttpStatus { status: u16, snippet: String },

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing provider token")]
    MissingToken,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid token header value")]
    InvalidToken,

    #[error("http client build failed: {0}")]
    Client(String),
}

impl ProviderError {
    /// Maps a non-success status plus a body snippet to a variant. The
    /// snippet is kept for every status.
    pub fn from_status(code: u16, snippet: String) -> Self {
        match code {
            401 => ProviderError::Unauthorized(snippet),
            403 => ProviderError::Forbidden(snippet),
            404 => ProviderError::NotFound(snippet),
            500..=599 => ProviderError::Server {
                status: code,
                snippet,
            },
            _ => ProviderError::HttpStatus {
                status: code,
                snippet,
            },
        }
    }
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(ProviderError::from(e))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }
        if e.is_decode() {
            return ProviderError::InvalidResponse(e.to_string());
        }
        if let Some(status) = e.status() {
            return ProviderError::from_status(status.as_u16(), String::new());
        }
        ProviderError::Network(e.to_string())
    }
}
