//! Assistant Service
//!
//! Combines the analytics report with a user request into one completion
//! call. Completion failures are classified and surfaced as in-band error
//! text; the caller renders the message where the reply would have been.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use super::prompts;
use crate::services::analytics::{format_for_ai, AnalyticsService};
use crate::services::llm::{CompletionError, TextCompletion};

/// Caller-facing assistant failures; Display text is shown verbatim
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Invalid API key. Please check your Gemini API key configuration.")]
    InvalidApiKey,

    #[error("API quota exceeded. Please check your Gemini API usage limits.")]
    QuotaExceeded,

    #[error("Failed to generate AI response. Please try again.")]
    Response,

    #[error("Failed to generate health report. Please try again.")]
    Report,

    #[error("Failed to analyze trends. Please try again.")]
    Trends,
}

fn classify(err: &CompletionError) -> AssistantError {
    match err {
        CompletionError::InvalidApiKey(_) => AssistantError::InvalidApiKey,
        CompletionError::QuotaExceeded(_) => AssistantError::QuotaExceeded,
        _ => AssistantError::Response,
    }
}

/// Patient intelligence assistant over an injected completion provider
pub struct AssistantService {
    provider: Arc<dyn TextCompletion>,
    analytics: Arc<AnalyticsService>,
}

impl AssistantService {
    pub fn new(provider: Arc<dyn TextCompletion>, analytics: Arc<AnalyticsService>) -> Self {
        Self {
            provider,
            analytics,
        }
    }

    async fn analytics_report(&self) -> String {
        let snapshot = self.analytics.comprehensive().await;
        format_for_ai(Some(&snapshot))
    }

    /// Answer a question with the full analytics context attached.
    ///
    /// One in-flight request per call; duplicate submission is the UI's
    /// concern. No retry on failure.
    pub async fn ask(&self, user_message: &str) -> Result<String, AssistantError> {
        let report = self.analytics_report().await;
        let prompt = prompts::chat_prompt(Some(&report), user_message);
        self.provider.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "assistant response failed");
            classify(&e)
        })
    }

    /// Answer a question without fetching analytics first.
    pub async fn ask_quick(&self, user_message: &str) -> Result<String, AssistantError> {
        let prompt = prompts::chat_prompt(None, user_message);
        self.provider.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "assistant response failed");
            classify(&e)
        })
    }

    /// Generate the full health report.
    pub async fn generate_health_report(&self) -> Result<String, AssistantError> {
        let report = self.analytics_report().await;
        let prompt = prompts::report_prompt(&report);
        self.provider.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "health report generation failed");
            AssistantError::Report
        })
    }

    /// Analyze trends of one kind; `None` analyzes all of them.
    pub async fn analyze_trends(&self, trend_kind: Option<&str>) -> Result<String, AssistantError> {
        let report = self.analytics_report().await;
        let prompt = prompts::trends_prompt(&report, trend_kind.unwrap_or("all"));
        self.provider.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "trend analysis failed");
            AssistantError::Trends
        })
    }
}
