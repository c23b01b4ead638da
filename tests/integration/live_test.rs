//! Live Subscription Integration Tests
//!
//! Drives the live views end-to-end over the in-memory store: initial
//! emissions, change pushes, and the acknowledgment write path.

use std::sync::Arc;

use serde_json::json;

use senticare_monitor::models::ActivityKind;
use senticare_monitor::services::live::LiveMonitor;
use senticare_monitor::store::{collections, DocumentStore, MemoryStore};
use senticare_monitor::DEMO_CAREGIVER_ID;

fn setup() -> (Arc<MemoryStore>, LiveMonitor) {
    let store = Arc::new(MemoryStore::new());
    let monitor = LiveMonitor::new(store.clone());
    (store, monitor)
}

#[tokio::test]
async fn test_status_document_stream_emits_resolved_state() {
    let (store, monitor) = setup();
    store
        .insert(
            collections::PATIENT_STATUS,
            "P1",
            json!({
                "currentState": {
                    "activity": "WALKING",
                    "timestamp": "2025-09-14T08:15:00Z",
                    "roomId": "Living Room"
                }
            }),
        )
        .await;

    let mut sub = monitor.subscribe_current_state("P1").await.unwrap();
    let state = sub.recv().await.unwrap().expect("state should resolve");
    assert_eq!(state.activity, ActivityKind::Walking);
    assert_eq!(state.timestamp.to_rfc3339(), "2025-09-14T08:15:00+00:00");
    assert_eq!(state.location, "Living Room");
}

#[tokio::test]
async fn test_status_stream_follows_updates() {
    let (store, monitor) = setup();
    store
        .insert(
            collections::PATIENT_STATUS,
            "P1",
            json!({ "currentState": { "activity": "SITTING", "roomId": "Bedroom" } }),
        )
        .await;

    let mut sub = monitor.subscribe_current_state("P1").await.unwrap();
    assert_eq!(
        sub.recv().await.unwrap().unwrap().activity,
        ActivityKind::Sitting
    );

    store
        .insert(
            collections::PATIENT_STATUS,
            "P1",
            json!({ "currentState": { "activity": "WALKING", "roomId": "Bedroom" } }),
        )
        .await;
    assert_eq!(
        sub.recv().await.unwrap().unwrap().activity,
        ActivityKind::Walking
    );
}

#[tokio::test]
async fn test_alert_stream_shrinks_after_acknowledgment() {
    let (store, monitor) = setup();
    for id in ["a1", "a2"] {
        store
            .insert(
                collections::ALERTS,
                id,
                json!({
                    "patientId": "P1",
                    "alertType": "FALL_DETECTED",
                    "timestamp": "2025-09-14T08:15:00Z",
                    "roomId": "Living Room",
                    "acknowledged": false
                }),
            )
            .await;
    }

    let mut sub = monitor.subscribe_unacknowledged_alerts("P1").await.unwrap();
    let initial = sub.recv().await.unwrap();
    assert_eq!(initial.len(), 2);

    monitor
        .acknowledge_alert("a1", DEMO_CAREGIVER_ID)
        .await
        .unwrap();

    let after = sub.recv().await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, "a2");
}

#[tokio::test]
async fn test_double_acknowledgment_is_noop() {
    let (store, monitor) = setup();
    store
        .insert(
            collections::ALERTS,
            "a1",
            json!({
                "patientId": "P1",
                "alertType": "HELP_SIGNAL_DETECTED",
                "timestamp": "2025-09-14T08:15:00Z",
                "acknowledged": false
            }),
        )
        .await;

    monitor
        .acknowledge_alert("a1", DEMO_CAREGIVER_ID)
        .await
        .unwrap();
    monitor
        .acknowledge_alert("a1", DEMO_CAREGIVER_ID)
        .await
        .unwrap();

    let doc = store
        .get_document(collections::ALERTS, "a1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc.bool_field("acknowledged"), Some(true));
    assert_eq!(doc.str_field("acknowledgedBy"), Some(DEMO_CAREGIVER_ID));
}

#[tokio::test]
async fn test_alert_stream_ignores_other_patients() {
    let (store, monitor) = setup();
    store
        .insert(
            collections::ALERTS,
            "mine",
            json!({
                "patientId": "P1",
                "alertType": "FALL_DETECTED",
                "timestamp": "2025-09-14T08:15:00Z",
                "acknowledged": false
            }),
        )
        .await;
    store
        .insert(
            collections::ALERTS,
            "theirs",
            json!({
                "patientId": "P2",
                "alertType": "FALL_DETECTED",
                "timestamp": "2025-09-14T08:15:00Z",
                "acknowledged": false
            }),
        )
        .await;

    let mut sub = monitor.subscribe_unacknowledged_alerts("P1").await.unwrap();
    let alerts = sub.recv().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "mine");
}

#[tokio::test]
async fn test_unsubscribe_twice_is_safe() {
    let (_store, monitor) = setup();
    let sub = monitor.subscribe_current_state("P1").await.unwrap();
    sub.unsubscribe();
    sub.unsubscribe();
}
