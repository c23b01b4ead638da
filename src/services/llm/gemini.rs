//! Gemini Provider
//!
//! Implementation of the TextCompletion trait over the Gemini
//! `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::provider::{missing_api_key_error, parse_http_error, TextCompletion};
use super::types::{CompletionError, CompletionResult};

/// Default Gemini API endpoint
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Gemini provider configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; requests fail with `InvalidApiKey` when absent
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Base URL override
    pub base_url: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
        }
    }
}

/// Gemini text-completion provider
pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(GEMINI_API_URL)
    }

    fn request_url(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url(),
            self.config.model,
            api_key
        )
    }

    /// Build the request body for the API
    fn build_request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        })
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let candidate = response.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl TextCompletion for GeminiProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| missing_api_key_error("gemini"))?;

        let response = self
            .client
            .post(self.request_url(api_key))
            .header("content-type", "application/json")
            .json(&Self::build_request_body(prompt))
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body_text = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body_text).map_err(|e| CompletionError::Parse(format!(
                "Failed to parse response: {}",
                e
            )))?;

        Self::extract_text(&parsed)
            .ok_or_else(|| CompletionError::Parse("Response contained no text".to_string()))
    }
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}
