//! Error types for remote catalog port operations.

use thiserror::Error;

/// Errors from remote catalog port operations.
///
/// These are domain-level errors that the pipeline can classify.
/// Implementation-specific errors (HTTP, JSON) are mapped to these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiPortError {
    /// The remote rejected the credentials or token.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// The requested resource does not exist.
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
    },

    /// API rate limit exceeded.
    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("Request failed with status {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },

    /// Network or connectivity error (including timeouts).
    #[error("Network error: {message}")]
    Network {
        message: String,
    },

    /// The remote answered with something we could not interpret.
    #[error("Invalid API response: {message}")]
    InvalidResponse {
        message: String,
    },

    /// The client is misconfigured (bad base URL, missing session).
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },
}

impl ApiPortError {
    /// HTTP status associated with this error, when there is one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited => Some(429),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for remote catalog port operations.
pub type ApiPortResult<T> = Result<T, ApiPortError>;
