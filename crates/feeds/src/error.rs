//! Error types for data source operations.

use thiserror::Error;

/// Errors that can occur while fetching from a data source.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Request failed: {0}")]
    ConnectionFailed(String),

    #[error("{source_name} returned HTTP {status}")]
    HttpStatus {
        source_name: &'static str,
        status: u16,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout(err.to_string())
        } else if err.is_decode() {
            FeedError::ParseError(err.to_string())
        } else {
            FeedError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::ParseError(err.to_string())
    }
}

impl FeedError {
    /// Map a non-success HTTP status to the closest error variant.
    pub fn from_status(source_name: &'static str, status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => FeedError::AuthenticationFailed(format!("{source_name} HTTP {status}")),
            429 => FeedError::RateLimitExceeded,
            code => FeedError::HttpStatus {
                source_name,
                status: code,
            },
        }
    }

    /// Returns true if this error is transient and likely to succeed next cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::ConnectionFailed(_)
            | FeedError::Timeout(_)
            | FeedError::RateLimitExceeded => true,
            FeedError::HttpStatus { status, .. } => *status >= 500,
            FeedError::ParseError(_) | FeedError::AuthenticationFailed(_) => false,
        }
    }
}

/// Result type for data source operations.
pub type FeedResult<T> = Result<T, FeedError>;
