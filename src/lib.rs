//! SentiCare Monitor - Service Core
//!
//! Backend service layer for the SentiCare patient-monitoring dashboard.
//! It provides:
//! - Live subscription views over the external document store
//! - Alert acknowledgment
//! - Concurrent analytics aggregation with per-read fallbacks
//! - A pure snapshot-to-report formatter
//! - The AI assistant request path over a text-completion provider

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use config::{AppConfig, DEMO_CAREGIVER_ID, DEMO_PATIENT_ID};
pub use models::{
    ActivityKind, Alert, AlertType, ComprehensiveAnalytics, CurrentState, DailySummary,
    FallRecord, RoomMetrics, SleepRecord, WellnessRecord,
};
pub use services::analytics::{format_for_ai, AnalyticsService};
pub use services::assistant::{AssistantError, AssistantService};
pub use services::live::LiveMonitor;
pub use services::llm::{GeminiProvider, TextCompletion};
pub use state::AppState;
pub use store::{DocumentStore, FirestoreStore, MemoryStore, Query, Subscription};
pub use utils::error::{AppError, AppResult};
