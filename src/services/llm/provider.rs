//! Completion Provider Trait
//!
//! The seam for the external text-completion collaborator: one prompt in,
//! one text completion out. Implementations classify their transport
//! errors into the shared `CompletionError` taxonomy.

use async_trait::async_trait;

use super::types::{CompletionError, CompletionResult};

/// A text-completion collaborator
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// The model identifier in use
    fn model(&self) -> &str;

    /// Send one prompt and return the completion text.
    async fn complete(&self, prompt: &str) -> CompletionResult<String>;
}

/// Error for a provider constructed without a credential
pub fn missing_api_key_error(provider: &str) -> CompletionError {
    CompletionError::InvalidApiKey(format!("API key not configured for {}", provider))
}

/// Map an HTTP error from a completion endpoint to a `CompletionError`.
///
/// Some services report credential and quota failures as 400s with a
/// marker in the body, so the body is inspected before the status code.
pub fn parse_http_error(status: u16, body: &str) -> CompletionError {
    if body.contains("API_KEY_INVALID") {
        return CompletionError::InvalidApiKey(body.to_string());
    }
    if body.contains("RESOURCE_EXHAUSTED") || body.contains("QUOTA_EXCEEDED") {
        return CompletionError::QuotaExceeded(body.to_string());
    }
    match status {
        401 | 403 => CompletionError::InvalidApiKey(body.to_string()),
        429 => CompletionError::QuotaExceeded(body.to_string()),
        400 => CompletionError::Other(body.to_string()),
        500..=599 => CompletionError::Server {
            status,
            message: body.to_string(),
        },
        _ => CompletionError::Other(format!("HTTP {}: {}", status, body)),
    }
}
