//! API-specific error types
//!
//! Failures of a single API call, and the mapping onto [`CvmError`] at the
//! port boundary.

use std::time::Duration;

use cvm_domain::CvmError;
use thiserror::Error;

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx response that carried a JSON body.
    #[error("Request rejected with status {status}")]
    Rejected { status: u16, envelope: serde_json::Value },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl From<CvmError> for ApiError {
    fn from(err: CvmError) -> Self {
        match err {
            CvmError::Network(message) => Self::Network(message),
            CvmError::Auth(message) => Self::Auth(message),
            CvmError::Config(message) => Self::Config(message),
            CvmError::NotFound(message) => Self::NotFound(message),
            CvmError::InvalidInput(message) => Self::Client(message),
            CvmError::Rejected { status, envelope } => Self::Rejected { status, envelope },
            CvmError::Internal(message) => Self::Server(message),
        }
    }
}

impl From<ApiError> for CvmError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Rejected { status, envelope } => Self::Rejected { status, envelope },
            ApiError::Auth(_) => Self::Auth(message),
            ApiError::NotFound(_) => Self::NotFound(message),
            ApiError::Client(_) => Self::InvalidInput(message),
            ApiError::Config(_) => Self::Config(message),
            ApiError::Decode(_) => Self::Internal(message),
            ApiError::RateLimit(_)
            | ApiError::Server(_)
            | ApiError::Network(_)
            | ApiError::Timeout(_) => Self::Network(message),
        }
    }
}
