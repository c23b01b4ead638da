//! Configuration
//!
//! Demo identities and collaborator credentials, loaded from the
//! environment with validated defaults. The patient and caregiver ids are
//! fixed for the demo deployment; a full system would derive them from its
//! authentication service.

use serde::{Deserialize, Serialize};

use crate::services::llm::DEFAULT_GEMINI_MODEL;
use crate::utils::error::{AppError, AppResult};

/// The demo patient whose data this deployment monitors
pub const DEMO_PATIENT_ID: &str = "pXT5aC3gQd9F8hJ2kL5n";

/// Placeholder caregiver identity recorded on acknowledgments
pub const DEMO_CAREGIVER_ID: &str = "demo_caregiver_01";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Patient whose records are read
    pub patient_id: String,
    /// Caregiver identity used for acknowledgments
    pub caregiver_id: String,
    /// Completion-service credential
    pub gemini_api_key: Option<String>,
    /// Completion model name
    pub gemini_model: String,
    /// Cloud project for the REST store; absent in in-memory runs
    pub firestore_project_id: Option<String>,
    /// Store API key
    pub firestore_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            patient_id: DEMO_PATIENT_ID.to_string(),
            caregiver_id: DEMO_CAREGIVER_ID.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            firestore_project_id: None,
            firestore_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, falling back to the demo
    /// defaults for anything unset.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let config = Self {
            patient_id: env_or("SENTICARE_PATIENT_ID", &defaults.patient_id),
            caregiver_id: env_or("SENTICARE_CAREGIVER_ID", &defaults.caregiver_id),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty()),
            gemini_model: env_or("SENTICARE_GEMINI_MODEL", &defaults.gemini_model),
            firestore_project_id: std::env::var("FIRESTORE_PROJECT_ID")
                .ok()
                .filter(|v| !v.is_empty()),
            firestore_api_key: std::env::var("FIRESTORE_API_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the services rely on.
    pub fn validate(&self) -> AppResult<()> {
        if self.patient_id.trim().is_empty() {
            return Err(AppError::config("patient_id must not be empty"));
        }
        if self.caregiver_id.trim().is_empty() {
            return Err(AppError::config("caregiver_id must not be empty"));
        }
        if self.gemini_model.trim().is_empty() {
            return Err(AppError::config("gemini_model must not be empty"));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
