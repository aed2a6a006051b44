//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CVM operations.
///
/// Port implementations report every failure through this type. A backend
/// rejection that carried a response body keeps the raw JSON envelope so the
/// wizard can recover field-level detail from it; every other variant is a
/// transport-level failure with a human readable message.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum CvmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend answered with an error status and a JSON body.
    #[error("Request rejected with status {status}")]
    Rejected { status: u16, envelope: serde_json::Value },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CvmError {
    /// Build a rejection from a status code and response body.
    pub fn rejected(status: u16, envelope: serde_json::Value) -> Self {
        Self::Rejected { status, envelope }
    }

    /// Response body of a backend rejection, if this error carries one.
    pub fn envelope(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Rejected { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Rejected { .. } => "rejected",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for CVM operations
pub type Result<T> = std::result::Result<T, CvmError>;
