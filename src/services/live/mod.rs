//! Live Subscription Views
//!
//! Standing subscriptions backing the dashboard's live surfaces: the
//! per-patient status document, the unacknowledged-alerts query, and the
//! most recent daily summary. Also carries the one write path this system
//! has, alert acknowledgment.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map};
use tracing::{info, warn};

use crate::models::{Alert, CurrentState, DailySummary};
use crate::store::{collections, Direction, DocumentStore, Query, StoreResult, Subscription};

/// Live views over an injected store handle
pub struct LiveMonitor {
    store: Arc<dyn DocumentStore>,
}

impl LiveMonitor {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Watch the patient's status document.
    ///
    /// Emits `None` when the document is missing or carries no resolvable
    /// state; the consumer decides how to render that.
    pub async fn subscribe_current_state(
        &self,
        patient_id: &str,
    ) -> StoreResult<Subscription<Option<CurrentState>>> {
        let sub = self
            .store
            .watch_document(collections::PATIENT_STATUS, patient_id)
            .await?;
        Ok(sub.map(|doc| {
            doc.and_then(|doc| {
                doc.get("currentState")
                    .and_then(|value| CurrentState::from_status_field(value, Utc::now()))
            })
        }))
    }

    /// Watch the patient's open alerts.
    ///
    /// Alert documents that fail to decode are dropped from the emission
    /// rather than failing the stream.
    pub async fn subscribe_unacknowledged_alerts(
        &self,
        patient_id: &str,
    ) -> StoreResult<Subscription<Vec<Alert>>> {
        let query = Query::collection(collections::ALERTS)
            .where_eq("patientId", patient_id)
            .where_eq("acknowledged", false);
        let sub = self.store.watch_query(&query).await?;
        Ok(sub.map(|docs| {
            docs.iter()
                .filter_map(|doc| {
                    let alert = Alert::from_document(doc, Utc::now());
                    if alert.is_none() {
                        warn!(id = %doc.id, "skipping undecodable alert document");
                    }
                    alert
                })
                .collect()
        }))
    }

    /// Watch the patient's most recent daily summary.
    pub async fn subscribe_recent_summary(
        &self,
        patient_id: &str,
    ) -> StoreResult<Subscription<Option<DailySummary>>> {
        let query = Query::collection(collections::DAILY_SUMMARIES)
            .where_eq("patientId", patient_id)
            .order_by("date", Direction::Descending)
            .limit(1);
        let sub = self.store.watch_query(&query).await?;
        Ok(sub.map(|docs| docs.iter().find_map(DailySummary::from_document)))
    }

    /// Mark an alert acknowledged by the given caregiver.
    ///
    /// Idempotent: acknowledging an already-acknowledged alert re-applies
    /// the same field values. On failure the local view is left alone; the
    /// next push from the store reconciles it. No retry.
    pub async fn acknowledge_alert(&self, alert_id: &str, actor_id: &str) -> StoreResult<()> {
        let mut fields = Map::new();
        fields.insert("acknowledged".to_string(), json!(true));
        fields.insert("acknowledgedBy".to_string(), json!(actor_id));

        match self
            .store
            .update_fields(collections::ALERTS, alert_id, &fields)
            .await
        {
            Ok(()) => {
                info!(alert = %alert_id, actor = %actor_id, "alert acknowledged");
                Ok(())
            }
            Err(e) => {
                warn!(alert = %alert_id, error = %e, "failed to acknowledge alert");
                Err(e)
            }
        }
    }
}
