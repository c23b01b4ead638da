//! Calendar and Numeric Helpers
//!
//! Date-window math for the 7-day analytics queries and the rounding rule
//! used by report averages.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Today's calendar date in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a date as the store's canonical `YYYY-MM-DD` key
pub fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Start of an inclusive trailing window ending at `end`.
///
/// `window_start(end, 7)` mirrors the upstream "past week" queries: the
/// range covers `[end - 7 days, end]`.
pub fn window_start(end: NaiveDate, days: i64) -> NaiveDate {
    end - Duration::days(days)
}

/// Round half-up to one decimal place.
///
/// `f64::round` rounds ties away from zero, which is half-up for the
/// non-negative averages reported here.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse an instant from the loose representations the store returns:
/// RFC 3339 strings, epoch seconds (integer or float), or epoch millis.
pub fn parse_instant(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Heuristic: values past the year 33658 in seconds are millis.
                if i > 100_000_000_000 {
                    Utc.timestamp_millis_opt(i).single()
                } else {
                    Utc.timestamp_opt(i, 0).single()
                }
            } else {
                n.as_f64()
                    .and_then(|f| Utc.timestamp_opt(f as i64, 0).single())
            }
        }
        _ => None,
    }
}
