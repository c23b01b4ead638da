//! Assistant Integration Tests
//!
//! Prompt assembly and error surfacing over canned completion providers
//! and the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use senticare_monitor::services::analytics::AnalyticsService;
use senticare_monitor::services::assistant::{AssistantError, AssistantService};
use senticare_monitor::services::llm::{CompletionError, CompletionResult, TextCompletion};
use senticare_monitor::store::MemoryStore;

/// Records the last prompt and returns a fixed reply.
struct RecordingCompletion {
    last_prompt: Mutex<Option<String>>,
    reply: String,
}

impl RecordingCompletion {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            last_prompt: Mutex::new(None),
            reply: reply.to_string(),
        })
    }

    async fn last_prompt(&self) -> String {
        self.last_prompt.lock().await.clone().expect("no prompt sent")
    }
}

#[async_trait]
impl TextCompletion for RecordingCompletion {
    fn model(&self) -> &str {
        "recording"
    }

    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        *self.last_prompt.lock().await = Some(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Fails every request with a fixed error.
struct FailingCompletion(CompletionError);

#[async_trait]
impl TextCompletion for FailingCompletion {
    fn model(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _prompt: &str) -> CompletionResult<String> {
        Err(self.0.clone())
    }
}

fn assistant_with(provider: Arc<dyn TextCompletion>) -> AssistantService {
    let analytics = Arc::new(AnalyticsService::new(Arc::new(MemoryStore::new()), "P1"));
    AssistantService::new(provider, analytics)
}

#[tokio::test]
async fn test_ask_attaches_patient_data_and_question() {
    let provider = RecordingCompletion::new("All good.");
    let assistant = assistant_with(provider.clone());

    let reply = assistant.ask("How is sleep?").await.unwrap();
    assert_eq!(reply, "All good.");

    let prompt = provider.last_prompt().await;
    assert!(prompt.starts_with("You are a Patient Intelligence Agent"));
    assert!(prompt.contains("CURRENT PATIENT DATA:"));
    assert!(prompt.contains("PATIENT ANALYTICS REPORT"));
    assert!(prompt.contains("USER QUESTION: How is sleep?"));
}

#[tokio::test]
async fn test_ask_quick_skips_analytics() {
    let provider = RecordingCompletion::new("Hello.");
    let assistant = assistant_with(provider.clone());

    assistant.ask_quick("Hello there").await.unwrap();

    let prompt = provider.last_prompt().await;
    assert!(prompt.contains("No current patient data available."));
    assert!(!prompt.contains("CURRENT PATIENT DATA:"));
}

#[tokio::test]
async fn test_credential_failure_surfaces_api_key_message() {
    let provider = Arc::new(FailingCompletion(CompletionError::InvalidApiKey(
        "API_KEY_INVALID".to_string(),
    )));
    let assistant = assistant_with(provider);

    let err = assistant.ask("How is sleep?").await.unwrap_err();
    assert_eq!(err, AssistantError::InvalidApiKey);
    assert!(err.to_string().contains("API key"));
}

#[tokio::test]
async fn test_quota_failure_surfaces_quota_message() {
    let provider = Arc::new(FailingCompletion(CompletionError::QuotaExceeded(
        "RESOURCE_EXHAUSTED".to_string(),
    )));
    let assistant = assistant_with(provider);

    let err = assistant.ask("How is sleep?").await.unwrap_err();
    assert!(err.to_string().contains("quota exceeded"));
}

#[tokio::test]
async fn test_other_failures_surface_generic_message() {
    let provider = Arc::new(FailingCompletion(CompletionError::Network(
        "offline".to_string(),
    )));
    let assistant = assistant_with(provider);

    let err = assistant.ask("How is sleep?").await.unwrap_err();
    assert_eq!(err, AssistantError::Response);
    assert!(err.to_string().contains("Failed to generate AI response"));
}

#[tokio::test]
async fn test_health_report_prompt_and_error() {
    let provider = RecordingCompletion::new("Report text.");
    let assistant = assistant_with(provider.clone());

    assistant.generate_health_report().await.unwrap();
    let prompt = provider.last_prompt().await;
    assert!(prompt.contains("comprehensive health report for John D."));
    assert!(prompt.contains("PATIENT DATA:"));

    let failing = assistant_with(Arc::new(FailingCompletion(CompletionError::InvalidApiKey(
        "bad".to_string(),
    ))));
    let err = failing.generate_health_report().await.unwrap_err();
    assert_eq!(err, AssistantError::Report);
}

#[tokio::test]
async fn test_trend_analysis_defaults_to_all() {
    let provider = RecordingCompletion::new("Trends.");
    let assistant = assistant_with(provider.clone());

    assistant.analyze_trends(None).await.unwrap();
    assert!(provider.last_prompt().await.contains("analyze the all trends"));

    assistant.analyze_trends(Some("sleep")).await.unwrap();
    assert!(provider.last_prompt().await.contains("analyze the sleep trends"));
}
