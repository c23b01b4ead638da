//! Fallback Data
//!
//! Substitute values returned when an upstream read fails or comes back
//! empty, keeping every downstream consumer total. All synthesis is
//! deterministic over the injected "today" so reports and tests are stable.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{
    ActivityKind, CurrentState, DailySummary, SleepRecord, WellnessRecord,
};
use crate::models::patient::SleepDetail;

/// Days covered by the synthesized sleep and wellness series
pub const WINDOW_DAYS: usize = 7;

/// Fixed nightly hours pattern, within the expected 6.5-8.5 band
const SLEEP_HOURS_PATTERN: [f64; WINDOW_DAYS] = [7.8, 7.1, 8.2, 6.9, 7.5, 8.4, 7.2];

/// Fixed wellness score pattern, within the expected 75-95 band
const WELLNESS_SCORE_PATTERN: [u8; WINDOW_DAYS] = [82, 78, 88, 75, 91, 85, 80];

const SLEEP_QUALITIES: [&str; 3] = ["Good", "Fair", "Excellent"];

/// Demo state shown when the status document exists but carries no state,
/// or does not exist at all.
pub fn demo_current_state(now: DateTime<Utc>) -> CurrentState {
    CurrentState {
        activity: ActivityKind::Standing,
        timestamp: now,
        location: "Room 325".to_string(),
    }
}

/// State shown when the status read itself failed.
pub fn unknown_current_state(now: DateTime<Utc>) -> CurrentState {
    CurrentState {
        activity: ActivityKind::Unknown,
        timestamp: now,
        location: "Unknown Location".to_string(),
    }
}

/// Mock summary for a day with no stored record. The wellness score stays
/// absent: no-data is reported as no-data, not as an invented number.
pub fn mock_today_summary(patient_id: &str, today: NaiveDate) -> DailySummary {
    let mut activities = BTreeMap::new();
    activities.insert("sleeping".to_string(), 7.5);
    activities.insert("sitting".to_string(), 8.2);
    activities.insert("walking".to_string(), 2.1);
    activities.insert("standing".to_string(), 6.2);

    DailySummary {
        date: today,
        patient_id: patient_id.to_string(),
        wellness_score: None,
        sleep: Some(SleepDetail {
            hours: 7.5,
            quality: Some("Good".to_string()),
            bedtime: Some("22:30".to_string()),
            wake_time: Some("06:00".to_string()),
        }),
        activities,
        room_metrics: BTreeMap::new(),
    }
}

/// Synthesized week of sleep records, most recent day first.
pub fn mock_sleep_week(today: NaiveDate) -> Vec<SleepRecord> {
    (0..WINDOW_DAYS)
        .map(|i| SleepRecord {
            date: today - Duration::days(i as i64),
            sleep_hours: SLEEP_HOURS_PATTERN[i],
            sleep_quality: SLEEP_QUALITIES[i % SLEEP_QUALITIES.len()].to_string(),
            bedtime: Some("22:30".to_string()),
            wake_time: Some("06:00".to_string()),
        })
        .collect()
}

/// Synthesized week of wellness records, most recent day first.
pub fn mock_wellness_week(today: NaiveDate) -> Vec<WellnessRecord> {
    (0..WINDOW_DAYS)
        .map(|i| {
            let mut factors = BTreeMap::new();
            factors.insert("sleep".to_string(), "Good".to_string());
            factors.insert("activity".to_string(), "Moderate".to_string());
            factors.insert("mood".to_string(), "Positive".to_string());
            WellnessRecord {
                date: today - Duration::days(i as i64),
                score: WELLNESS_SCORE_PATTERN[i],
                factors,
            }
        })
        .collect()
}
