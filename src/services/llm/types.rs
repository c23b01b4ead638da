//! Completion Types
//!
//! Error taxonomy and result alias for the text-completion collaborator.

use thiserror::Error;

/// Errors surfaced by completion requests
#[derive(Error, Debug, Clone)]
pub enum CompletionError {
    /// The credential was rejected
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// The account's usage limits are exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The service returned a payload that could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Server-side failure
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Anything else
    #[error("Completion error: {0}")]
    Other(String),
}

/// Result type alias for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;
