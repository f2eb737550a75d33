//! Internal error types for Megascans API operations.
//!
//! These errors are internal to `megafetch-api` and are mapped to core port
//! errors at the boundary.

use thiserror::Error;

/// Result type alias for Megascans API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Longest response body excerpt kept in an error message.
const MAX_BODY_EXCERPT: usize = 200;

/// Errors related to Megascans API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// API request failed with an HTTP error status.
    #[error("Megascans request failed with status {status}: {url}: {message}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
        /// Excerpt of the response body
        message: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from Megascans API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// An authorized call was made before any session was established.
    #[error("Not authenticated: {message}")]
    NotAuthenticated {
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ApiError {
    /// Build a status error, keeping a short excerpt of the body.
    pub fn status(status: u16, url: impl Into<String>, body: &str) -> Self {
        let message = body.trim().chars().take(MAX_BODY_EXCERPT).collect();
        Self::ApiRequestFailed {
            status,
            url: url.into(),
            message,
        }
    }

    /// Whether the remote rejected the bearer token.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::ApiRequestFailed { status: 401, .. })
    }
}
