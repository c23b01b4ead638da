//! Analytics Integration Tests
//!
//! The aggregation pipeline end-to-end: seeded reads, empty-store mocks,
//! failing-store degradation, and the formatted report.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use senticare_monitor::models::ActivityKind;
use senticare_monitor::services::analytics::{format_for_ai, AnalyticsService, NO_FALLS_LINE};
use senticare_monitor::store::{
    collections, Document, DocumentStore, MemoryStore, Query, StoreError, StoreResult,
    Subscription,
};
use senticare_monitor::utils::time::{today_utc, ymd};

/// A store whose every operation fails, simulating a dead upstream.
struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get_document(&self, _collection: &str, _id: &str) -> StoreResult<Option<Document>> {
        Err(StoreError::network("connection refused"))
    }

    async fn run_query(&self, _query: &Query) -> StoreResult<Vec<Document>> {
        Err(StoreError::network("connection refused"))
    }

    async fn update_fields(
        &self,
        _collection: &str,
        _id: &str,
        _fields: &Map<String, Value>,
    ) -> StoreResult<()> {
        Err(StoreError::network("connection refused"))
    }

    async fn watch_document(
        &self,
        _collection: &str,
        _id: &str,
    ) -> StoreResult<Subscription<Option<Document>>> {
        Err(StoreError::network("connection refused"))
    }

    async fn watch_query(&self, _query: &Query) -> StoreResult<Subscription<Vec<Document>>> {
        Err(StoreError::network("connection refused"))
    }
}

fn failing_service() -> AnalyticsService {
    AnalyticsService::new(Arc::new(FailingStore), "P1")
}

async fn seeded_service() -> (Arc<MemoryStore>, AnalyticsService) {
    let store = Arc::new(MemoryStore::new());
    let service = AnalyticsService::new(store.clone(), "P1");
    (store, service)
}

#[tokio::test]
async fn test_failing_reads_degrade_without_raising() {
    let service = failing_service();

    let state = service.current_state().await;
    assert_eq!(state.activity, ActivityKind::Unknown);
    assert_eq!(state.location, "Unknown Location");

    let summary = service.today_summary().await;
    assert_eq!(summary.wellness_score, None);
    assert_eq!(summary.sleep_hours(), Some(7.5));

    assert_eq!(service.sleep_analysis().await.len(), 7);
    assert!(service.fall_history().await.is_empty());
    assert_eq!(service.wellness_scores().await.len(), 7);
}

#[tokio::test]
async fn test_comprehensive_is_fully_populated_on_total_failure() {
    let service = failing_service();
    let snapshot = service.comprehensive().await;

    assert_eq!(snapshot.patient_id, "P1");
    assert_eq!(snapshot.sleep_analysis.len(), 7);
    assert_eq!(snapshot.wellness_scores.len(), 7);
    assert!(snapshot.fall_history.is_empty());
    // The mock summary carries an activity breakdown, so the derived
    // section is present as well.
    assert!(snapshot.activity_breakdown.is_some());
}

#[tokio::test]
async fn test_empty_store_uses_demo_state() {
    let (_store, service) = seeded_service().await;
    let state = service.current_state().await;
    assert_eq!(state.activity, ActivityKind::Standing);
    assert_eq!(state.location, "Room 325");
}

#[tokio::test]
async fn test_seeded_current_state_wins_over_fallback() {
    let (store, service) = seeded_service().await;
    store
        .insert(
            collections::PATIENT_STATUS,
            "P1",
            json!({
                "currentState": {
                    "activity": "IN_BED",
                    "timestamp": "2025-09-14T02:00:00Z",
                    "roomId": "Bedroom"
                }
            }),
        )
        .await;

    let state = service.current_state().await;
    assert_eq!(state.activity, ActivityKind::InBed);
    assert_eq!(state.location, "Bedroom");
}

#[tokio::test]
async fn test_sleep_window_reads_stored_summaries() {
    let (store, service) = seeded_service().await;
    let today = today_utc();
    for (i, hours) in [6.0, 7.0, 8.0].iter().enumerate() {
        let date = today - chrono::Duration::days(i as i64);
        store
            .insert(
                collections::DAILY_SUMMARIES,
                &format!("d{}", i),
                json!({
                    "patientId": "P1",
                    "date": ymd(date),
                    "sleep": { "hours": hours, "quality": "Good" }
                }),
            )
            .await;
    }

    let records = service.sleep_analysis().await;
    assert_eq!(records.len(), 3);
    // Ordered most recent first.
    assert_eq!(records[0].sleep_hours, 6.0);
    assert_eq!(records[2].sleep_hours, 8.0);
}

#[tokio::test]
async fn test_fall_history_reads_only_acknowledged_falls() {
    let (store, service) = seeded_service().await;
    store
        .insert(
            collections::ALERTS,
            "ack",
            json!({
                "patientId": "P1",
                "alertType": "FALL_DETECTED",
                "timestamp": "2025-08-26T15:30:00Z",
                "roomId": "Living Room",
                "severity": "High",
                "acknowledged": true,
                "acknowledgedBy": "demo_caregiver_01"
            }),
        )
        .await;
    store
        .insert(
            collections::ALERTS,
            "open",
            json!({
                "patientId": "P1",
                "alertType": "FALL_DETECTED",
                "timestamp": "2025-09-01T10:00:00Z",
                "acknowledged": false
            }),
        )
        .await;
    store
        .insert(
            collections::ALERTS,
            "help",
            json!({
                "patientId": "P1",
                "alertType": "HELP_SIGNAL_DETECTED",
                "timestamp": "2025-09-05T10:00:00Z",
                "acknowledged": true
            }),
        )
        .await;

    let falls = service.fall_history().await;
    assert_eq!(falls.len(), 1);
    assert_eq!(falls[0].id, "ack");
    assert_eq!(falls[0].severity, "High");
    assert_eq!(falls[0].acknowledged_by, "demo_caregiver_01");
}

#[tokio::test]
async fn test_report_mean_of_known_hours() {
    let (store, service) = seeded_service().await;
    let today = today_utc();
    for (i, hours) in [6.0, 7.0, 8.0].iter().enumerate() {
        let date = today - chrono::Duration::days(i as i64);
        store
            .insert(
                collections::DAILY_SUMMARIES,
                &format!("d{}", i),
                json!({
                    "patientId": "P1",
                    "date": ymd(date),
                    "sleep": { "hours": hours, "quality": "Good" }
                }),
            )
            .await;
    }

    let snapshot = service.comprehensive().await;
    let report = format_for_ai(Some(&snapshot));
    assert!(report.contains("- Average: 7.0 hours/night"));
}

#[tokio::test]
async fn test_report_contains_no_falls_sentinel() {
    let service = failing_service();
    let snapshot = service.comprehensive().await;
    let report = format_for_ai(Some(&snapshot));
    assert!(report.contains(NO_FALLS_LINE));
}

#[tokio::test]
async fn test_format_is_byte_identical_for_same_snapshot() {
    let service = failing_service();
    let snapshot = service.comprehensive().await;
    assert_eq!(format_for_ai(Some(&snapshot)), format_for_ai(Some(&snapshot)));
}
