//! Analytics Service
//!
//! Pulls the five independent record sets behind one snapshot: current
//! state, today's summary, the 7-day sleep and wellness windows, and the
//! acknowledged-fall history. Every read catches its own failure and
//! degrades to a documented fallback, so the merged snapshot is always
//! fully populated.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::fallback;
use crate::models::{
    Alert, ComprehensiveAnalytics, CurrentState, DailySummary, FallRecord, SleepRecord,
    WellnessRecord,
};
use crate::store::{collections, Direction, Document, DocumentStore, Query};
use crate::utils::time::{today_utc, window_start, ymd};

/// Cap on the fall-history read
const FALL_HISTORY_LIMIT: usize = 10;

/// Aggregates upstream reads into `ComprehensiveAnalytics` snapshots
pub struct AnalyticsService {
    store: Arc<dyn DocumentStore>,
    patient_id: String,
}

impl AnalyticsService {
    /// Create a service bound to one patient over an injected store handle
    pub fn new(store: Arc<dyn DocumentStore>, patient_id: impl Into<String>) -> Self {
        Self {
            store,
            patient_id: patient_id.into(),
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// The patient's current state. Absent document or state field yields
    /// the demo fallback; a failed read yields the unknown fallback.
    pub async fn current_state(&self) -> CurrentState {
        let now = Utc::now();
        match self
            .store
            .get_document(collections::PATIENT_STATUS, &self.patient_id)
            .await
        {
            Ok(Some(doc)) => {
                if let Some(state) = doc
                    .get("currentState")
                    .and_then(|value| CurrentState::from_status_field(value, now))
                {
                    state
                } else {
                    debug!(patient = %self.patient_id, "status document has no current state");
                    fallback::demo_current_state(now)
                }
            }
            Ok(None) => {
                debug!(patient = %self.patient_id, "no status document");
                fallback::demo_current_state(now)
            }
            Err(e) => {
                warn!(patient = %self.patient_id, error = %e, "current state read failed");
                fallback::unknown_current_state(now)
            }
        }
    }

    /// Today's summary, or the deterministic mock when none is stored.
    pub async fn today_summary(&self) -> DailySummary {
        let today = today_utc();
        let query = Query::collection(collections::DAILY_SUMMARIES)
            .where_eq("patientId", self.patient_id.clone())
            .where_eq("date", ymd(today))
            .limit(1);

        match self.store.run_query(&query).await {
            Ok(docs) => docs
                .iter()
                .find_map(DailySummary::from_document)
                .unwrap_or_else(|| {
                    debug!(patient = %self.patient_id, "no summary for today, using mock");
                    fallback::mock_today_summary(&self.patient_id, today)
                }),
            Err(e) => {
                warn!(patient = %self.patient_id, error = %e, "today summary read failed");
                fallback::mock_today_summary(&self.patient_id, today)
            }
        }
    }

    /// Sleep records for the past week, most recent first. An empty window
    /// is filled with the synthesized series.
    pub async fn sleep_analysis(&self) -> Vec<SleepRecord> {
        let today = today_utc();
        match self.store.run_query(&self.window_query(today)).await {
            Ok(docs) => {
                let records: Vec<SleepRecord> = docs
                    .iter()
                    .filter_map(DailySummary::from_document)
                    .filter_map(|summary| sleep_record(&summary))
                    .collect();
                if records.is_empty() {
                    debug!(patient = %self.patient_id, "no sleep records, synthesizing week");
                    fallback::mock_sleep_week(today)
                } else {
                    records
                }
            }
            Err(e) => {
                warn!(patient = %self.patient_id, error = %e, "sleep analysis read failed");
                fallback::mock_sleep_week(today)
            }
        }
    }

    /// Acknowledged falls, newest first, capped at ten. Absence of falls is
    /// meaningful, so there is no synthesized fallback here.
    pub async fn fall_history(&self) -> Vec<FallRecord> {
        let query = Query::collection(collections::ALERTS)
            .where_eq("patientId", self.patient_id.clone())
            .where_eq("alertType", "FALL_DETECTED")
            .where_eq("acknowledged", true)
            .order_by("timestamp", Direction::Descending)
            .limit(FALL_HISTORY_LIMIT);

        match self.store.run_query(&query).await {
            Ok(docs) => docs.iter().filter_map(|doc| fall_record(doc)).collect(),
            Err(e) => {
                warn!(patient = %self.patient_id, error = %e, "fall history read failed");
                Vec::new()
            }
        }
    }

    /// Wellness scores for the past week, most recent first, synthesized
    /// when the window holds no scored days.
    pub async fn wellness_scores(&self) -> Vec<WellnessRecord> {
        let today = today_utc();
        match self.store.run_query(&self.window_query(today)).await {
            Ok(docs) => {
                let records: Vec<WellnessRecord> = docs
                    .iter()
                    .filter_map(|doc| wellness_record(doc))
                    .collect();
                if records.is_empty() {
                    debug!(patient = %self.patient_id, "no wellness records, synthesizing week");
                    fallback::mock_wellness_week(today)
                } else {
                    records
                }
            }
            Err(e) => {
                warn!(patient = %self.patient_id, error = %e, "wellness read failed");
                fallback::mock_wellness_week(today)
            }
        }
    }

    /// Run all five reads concurrently and merge them into one snapshot.
    ///
    /// Each branch already degrades internally, so the join cannot fail and
    /// the snapshot is never partial.
    pub async fn comprehensive(&self) -> ComprehensiveAnalytics {
        let (current_state, today_summary, sleep_analysis, fall_history, wellness_scores) = tokio::join!(
            self.current_state(),
            self.today_summary(),
            self.sleep_analysis(),
            self.fall_history(),
            self.wellness_scores(),
        );

        let activity_breakdown =
            (!today_summary.activities.is_empty()).then(|| today_summary.activities.clone());

        ComprehensiveAnalytics {
            patient_id: self.patient_id.clone(),
            current_state,
            today_summary,
            activity_breakdown,
            sleep_analysis,
            fall_history,
            wellness_scores,
            generated_at: Utc::now(),
        }
    }

    /// The shared 7-day summaries window, ordered most recent first.
    fn window_query(&self, today: NaiveDate) -> Query {
        Query::collection(collections::DAILY_SUMMARIES)
            .where_eq("patientId", self.patient_id.clone())
            .where_gte("date", ymd(window_start(today, 7)))
            .where_lte("date", ymd(today))
            .order_by("date", Direction::Descending)
    }
}

fn sleep_record(summary: &DailySummary) -> Option<SleepRecord> {
    let sleep_hours = summary.sleep_hours()?;
    let detail = summary.sleep.as_ref();
    Some(SleepRecord {
        date: summary.date,
        sleep_hours,
        sleep_quality: detail
            .and_then(|d| d.quality.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        bedtime: detail.and_then(|d| d.bedtime.clone()),
        wake_time: detail.and_then(|d| d.wake_time.clone()),
    })
}

fn fall_record(doc: &Document) -> Option<FallRecord> {
    let now = Utc::now();
    let alert = Alert::from_document(doc, now)?;
    Some(FallRecord {
        id: alert.id,
        timestamp: alert.timestamp,
        location: doc
            .str_field("location")
            .unwrap_or(&alert.room_id)
            .to_string(),
        severity: doc.str_field("severity").unwrap_or("Unknown").to_string(),
        acknowledged_at: doc.timestamp_field("acknowledgedAt"),
        acknowledged_by: alert
            .acknowledged_by
            .unwrap_or_else(|| "Unknown".to_string()),
    })
}

fn wellness_record(doc: &Document) -> Option<WellnessRecord> {
    let summary = DailySummary::from_document(doc)?;
    let score = summary.wellness_score?;
    let factors = doc
        .get("wellnessFactors")
        .and_then(|value| serde_json::from_value::<std::collections::BTreeMap<String, String>>(
            Value::clone(value),
        ).ok())
        .unwrap_or_default();
    Some(WellnessRecord {
        date: summary.date,
        score,
        factors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sleep_record_requires_sleep_data() {
        let doc = Document::new("d1", json!({ "patientId": "p1", "date": "2025-09-14" }));
        let summary = DailySummary::from_document(&doc).unwrap();
        assert!(sleep_record(&summary).is_none());
    }

    #[test]
    fn test_fall_record_defaults() {
        let doc = Document::new(
            "a1",
            json!({
                "patientId": "p1",
                "alertType": "FALL_DETECTED",
                "timestamp": "2025-08-26T15:30:00Z",
                "roomId": "Living Room",
                "acknowledged": true
            }),
        );
        let record = fall_record(&doc).unwrap();
        assert_eq!(record.location, "Living Room");
        assert_eq!(record.severity, "Unknown");
        assert_eq!(record.acknowledged_by, "Unknown");
    }

    #[test]
    fn test_wellness_record_requires_score() {
        let doc = Document::new("d1", json!({ "patientId": "p1", "date": "2025-09-14" }));
        assert!(wellness_record(&doc).is_none());

        let scored = Document::new(
            "d2",
            json!({
                "patientId": "p1",
                "date": "2025-09-14",
                "wellnessScore": 84,
                "wellnessFactors": { "sleep": "Good" }
            }),
        );
        let record = wellness_record(&scored).unwrap();
        assert_eq!(record.score, 84);
        assert_eq!(record.factors["sleep"], "Good");
    }
}
