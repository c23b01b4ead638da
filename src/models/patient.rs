//! Patient Models
//!
//! Views over the store's patient records: live status, daily summaries,
//! and alerts. Upstream writers have drifted over time, so parsing here is
//! tolerant: unknown activity strings survive as `Other`, and the status
//! document is resolved through a single ordered-candidate function.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Document;
use crate::utils::time::parse_instant;

/// Location shown when a status record carries no room information
pub const FALLBACK_LOCATION: &str = "Room 101";

/// Recognized activity states, with `Other` for upstream drift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Walking,
    Sitting,
    Standing,
    InBed,
    NotPresent,
    Unknown,
    #[serde(untagged)]
    Other(String),
}

impl ActivityKind {
    /// Parse an upstream activity string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "WALKING" => Self::Walking,
            "SITTING" => Self::Sitting,
            "STANDING" => Self::Standing,
            "IN_BED" | "SLEEPING" => Self::InBed,
            "NOT_PRESENT" | "AWAY" => Self::NotPresent,
            "UNKNOWN" | "" => Self::Unknown,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Walking => write!(f, "WALKING"),
            ActivityKind::Sitting => write!(f, "SITTING"),
            ActivityKind::Standing => write!(f, "STANDING"),
            ActivityKind::InBed => write!(f, "IN_BED"),
            ActivityKind::NotPresent => write!(f, "NOT_PRESENT"),
            ActivityKind::Unknown => write!(f, "UNKNOWN"),
            ActivityKind::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// The patient's most recent observed state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    /// Resolved activity
    pub activity: ActivityKind,
    /// When the state was observed
    pub timestamp: DateTime<Utc>,
    /// Room or location label
    pub location: String,
}

impl CurrentState {
    /// Resolve a state from the `currentState` field of a status document.
    ///
    /// Field precedence, reflecting upstream schema drift:
    /// activity: `activity`, `state`, `eventType`, then the bare value when
    /// the field is a plain string. Location: `location`, `roomId`, `room`,
    /// then [`FALLBACK_LOCATION`]. Timestamp: the record's `timestamp`,
    /// then `now`.
    ///
    /// Returns `None` only when `value` is neither a string nor an object,
    /// so callers always end up with a displayable state or their own
    /// fallback.
    pub fn from_status_field(value: &Value, now: DateTime<Utc>) -> Option<Self> {
        let activity_raw = match value {
            Value::String(s) => s.clone(),
            Value::Object(map) => ["activity", "state", "eventType"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .unwrap_or("UNKNOWN")
                .to_string(),
            _ => return None,
        };

        let location = value
            .as_object()
            .and_then(|map| {
                ["location", "roomId", "room"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
            })
            .unwrap_or(FALLBACK_LOCATION)
            .to_string();

        let timestamp = value
            .get("timestamp")
            .and_then(parse_instant)
            .unwrap_or(now);

        Some(Self {
            activity: ActivityKind::parse(&activity_raw),
            timestamp,
            location,
        })
    }
}

/// Per-room activity counters for one day, all in seconds except the counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomMetrics {
    pub time_in_bed_seconds: u64,
    pub sitting_time_seconds: u64,
    pub standing_time_seconds: u64,
    pub walking_time_seconds: u64,
    pub not_present_time_seconds: u64,
    pub idle_time_seconds: u64,
    pub fall_count: u32,
    pub help_signal_count: u32,
}

/// Sleep details recorded on a daily summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepDetail {
    pub hours: f64,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub bedtime: Option<String>,
    #[serde(default)]
    pub wake_time: Option<String>,
}

/// One summary record per (patient, day)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub patient_id: String,
    /// 0-100, absent until the scoring pass has run
    pub wellness_score: Option<u8>,
    pub sleep: Option<SleepDetail>,
    /// Activity name to hours spent
    pub activities: BTreeMap<String, f64>,
    pub room_metrics: BTreeMap<String, RoomMetrics>,
}

impl DailySummary {
    /// Decode a summary document.
    ///
    /// The day key drifted upstream: newer records carry a `date` string,
    /// older ones a `summaryDate` instant. Both are accepted, `date` first.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let fields = doc.fields.as_object()?;

        let date = fields
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .or_else(|| {
                fields
                    .get("summaryDate")
                    .and_then(parse_instant)
                    .map(|ts| ts.date_naive())
            })?;

        let patient_id = fields
            .get("patientId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let wellness_score = fields
            .get("wellnessScore")
            .and_then(Value::as_u64)
            .map(|score| score.min(100) as u8);

        let sleep = fields
            .get("sleep")
            .and_then(|v| serde_json::from_value(v.clone()).ok());

        let activities = fields
            .get("activities")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        let room_metrics = fields
            .get("roomMetrics")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        Some(Self {
            date,
            patient_id,
            wellness_score,
            sleep,
            activities,
            room_metrics,
        })
    }

    /// Hours asleep for the day: the explicit sleep block when present,
    /// otherwise derived from time-in-bed counters across all rooms.
    pub fn sleep_hours(&self) -> Option<f64> {
        if let Some(sleep) = &self.sleep {
            return Some(sleep.hours);
        }
        let bed_seconds: u64 = self
            .room_metrics
            .values()
            .map(|m| m.time_in_bed_seconds)
            .sum();
        if bed_seconds > 0 {
            Some(bed_seconds as f64 / 3600.0)
        } else {
            None
        }
    }
}

/// Alert categories raised by the upstream detection system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    FallDetected,
    HelpSignalDetected,
    Other(String),
}

impl AlertType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "FALL_DETECTED" => Self::FallDetected,
            "HELP_SIGNAL_DETECTED" => Self::HelpSignalDetected,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Whether this alert describes a fall, tolerating drifted labels.
    pub fn is_fall(&self) -> bool {
        match self {
            Self::FallDetected => true,
            Self::HelpSignalDetected => false,
            Self::Other(raw) => raw.to_ascii_lowercase().contains("fall"),
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertType::FallDetected => write!(f, "FALL_DETECTED"),
            AlertType::HelpSignalDetected => write!(f, "HELP_SIGNAL_DETECTED"),
            AlertType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// An alert raised for a patient; acknowledged at most once by a caregiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub patient_id: String,
    pub alert_type: AlertType,
    pub timestamp: DateTime<Utc>,
    pub room_id: String,
    pub confidence_score: Option<f64>,
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
}

impl Alert {
    /// Decode an alert document; `None` when the timestamp is unreadable.
    pub fn from_document(doc: &Document, now: DateTime<Utc>) -> Option<Self> {
        let fields = doc.fields.as_object()?;

        let alert_type = fields
            .get("alertType")
            .and_then(Value::as_str)
            .map(AlertType::parse)?;

        let timestamp = fields.get("timestamp").and_then(parse_instant).unwrap_or(now);

        Some(Self {
            id: doc.id.clone(),
            patient_id: fields
                .get("patientId")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            alert_type,
            timestamp,
            room_id: fields
                .get("roomId")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            confidence_score: fields.get("confidenceScore").and_then(Value::as_f64),
            acknowledged: fields
                .get("acknowledged")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            acknowledged_by: fields
                .get("acknowledgedBy")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}
