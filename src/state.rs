//! Application State
//!
//! Wires configuration, the store handle, and the completion provider into
//! the three services the host consumes. Collaborators are injected, so
//! tests and demo runs can swap in the in-memory store or a canned
//! completion provider.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::analytics::AnalyticsService;
use crate::services::assistant::AssistantService;
use crate::services::live::LiveMonitor;
use crate::services::llm::{GeminiConfig, GeminiProvider, TextCompletion};
use crate::store::{DocumentStore, FirestoreConfig, FirestoreStore};
use crate::utils::error::{AppError, AppResult};

/// The wired service graph handed to the host
pub struct AppState {
    pub config: AppConfig,
    pub live: LiveMonitor,
    pub analytics: Arc<AnalyticsService>,
    pub assistant: AssistantService,
}

impl AppState {
    /// Assemble the services over explicit collaborator handles.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        provider: Arc<dyn TextCompletion>,
    ) -> Self {
        let live = LiveMonitor::new(store.clone());
        let analytics = Arc::new(AnalyticsService::new(store, config.patient_id.clone()));
        let assistant = AssistantService::new(provider, analytics.clone());
        Self {
            config,
            live,
            analytics,
            assistant,
        }
    }

    /// Assemble the production graph from the environment: the Firestore
    /// REST store and the Gemini provider.
    pub fn from_env() -> AppResult<Self> {
        let config = AppConfig::from_env()?;

        let project_id = config
            .firestore_project_id
            .clone()
            .ok_or_else(|| AppError::config("FIRESTORE_PROJECT_ID is not set"))?;
        let mut store_config = FirestoreConfig::new(project_id);
        if let Some(api_key) = &config.firestore_api_key {
            store_config = store_config.with_api_key(api_key.clone());
        }
        let store: Arc<dyn DocumentStore> = Arc::new(FirestoreStore::new(store_config));

        let provider: Arc<dyn TextCompletion> = Arc::new(GeminiProvider::new(GeminiConfig {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: None,
        }));

        Ok(Self::new(config, store, provider))
    }
}
