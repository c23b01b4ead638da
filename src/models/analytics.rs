//! Analytics Models
//!
//! The merged analytics snapshot and its per-series record types. The
//! snapshot is constructed in memory by the aggregator and never persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::patient::{CurrentState, DailySummary};

/// One night of sleep derived from a daily summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub date: NaiveDate,
    pub sleep_hours: f64,
    pub sleep_quality: String,
    pub bedtime: Option<String>,
    pub wake_time: Option<String>,
}

/// An acknowledged fall from the alert history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub severity: String,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub acknowledged_by: String,
}

/// One day's wellness score with its contributing factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessRecord {
    pub date: NaiveDate,
    /// 0-100, higher is better
    pub score: u8,
    pub factors: BTreeMap<String, String>,
}

/// The merged result of one aggregation cycle across all upstream reads.
///
/// Always fully populated: every sub-read degrades to its own fallback, so
/// no field is ever missing even when every upstream call failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComprehensiveAnalytics {
    pub patient_id: String,
    pub current_state: CurrentState,
    pub today_summary: DailySummary,
    /// Activity name to hours, absent when today's summary has no breakdown
    pub activity_breakdown: Option<BTreeMap<String, f64>>,
    pub sleep_analysis: Vec<SleepRecord>,
    pub fall_history: Vec<FallRecord>,
    pub wellness_scores: Vec<WellnessRecord>,
    pub generated_at: DateTime<Utc>,
}

impl ComprehensiveAnalytics {
    /// Mean sleep hours across the analysis window, unrounded.
    pub fn average_sleep_hours(&self) -> Option<f64> {
        if self.sleep_analysis.is_empty() {
            return None;
        }
        let total: f64 = self.sleep_analysis.iter().map(|s| s.sleep_hours).sum();
        Some(total / self.sleep_analysis.len() as f64)
    }

    /// Mean wellness score across the trend window, unrounded.
    pub fn average_wellness(&self) -> Option<f64> {
        if self.wellness_scores.is_empty() {
            return None;
        }
        let total: f64 = self.wellness_scores.iter().map(|w| w.score as f64).sum();
        Some(total / self.wellness_scores.len() as f64)
    }
}
