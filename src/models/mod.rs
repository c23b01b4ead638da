//! Data Models
//!
//! Read-only views over externally stored patient records, plus the
//! in-memory analytics snapshot. Nothing here owns persistence.

pub mod analytics;
pub mod patient;

pub use analytics::{ComprehensiveAnalytics, FallRecord, SleepRecord, WellnessRecord};
pub use patient::{ActivityKind, Alert, AlertType, CurrentState, DailySummary, RoomMetrics};
