//! Report Formatter
//!
//! Serializes an analytics snapshot into the bounded plain-text report the
//! assistant feeds to the completion service. Pure: same snapshot in, same
//! bytes out.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::ComprehensiveAnalytics;
use crate::utils::time::{round1, ymd};

/// Report shown when no snapshot could be produced at all
pub const NO_DATA_SENTINEL: &str = "No analytics data available.";

/// Line emitted when the acknowledged-fall history is empty
pub const NO_FALLS_LINE: &str = "FALL HISTORY: No recent acknowledged falls";

fn clock(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render a snapshot as the patient analytics report.
///
/// Total over its input: an absent snapshot yields the fixed sentinel.
pub fn format_for_ai(snapshot: Option<&ComprehensiveAnalytics>) -> String {
    let Some(snapshot) = snapshot else {
        return NO_DATA_SENTINEL.to_string();
    };
    let mut out = String::new();

    let _ = writeln!(
        out,
        "PATIENT ANALYTICS REPORT - Generated: {}",
        snapshot.generated_at.to_rfc3339()
    );
    let _ = writeln!(out, "Patient ID: {}", snapshot.patient_id);
    out.push('\n');

    // Current state
    let _ = writeln!(out, "CURRENT STATE:");
    let _ = writeln!(out, "- Activity: {}", snapshot.current_state.activity);
    let _ = writeln!(out, "- Location: {}", snapshot.current_state.location);
    let _ = writeln!(
        out,
        "- Last Update: {}",
        clock(&snapshot.current_state.timestamp)
    );
    out.push('\n');

    // Today's summary
    let _ = writeln!(out, "TODAY'S SUMMARY:");
    if let Some(hours) = snapshot.today_summary.sleep_hours() {
        let _ = writeln!(out, "- Sleep: {:.1} hours", round1(hours));
    }
    if let Some(score) = snapshot.today_summary.wellness_score {
        let _ = writeln!(out, "- Wellness Score: {}/100", score);
    }
    out.push('\n');

    // Activity breakdown
    if let Some(breakdown) = snapshot
        .activity_breakdown
        .as_ref()
        .filter(|b| !b.is_empty())
    {
        let _ = writeln!(out, "ACTIVITY BREAKDOWN (Today):");
        for (activity, hours) in breakdown {
            let _ = writeln!(out, "- {}: {:.1} hours", activity, round1(*hours));
        }
        out.push('\n');
    }

    // Sleep analysis
    if !snapshot.sleep_analysis.is_empty() {
        let _ = writeln!(out, "SLEEP ANALYSIS (Past 7 days):");
        for sleep in &snapshot.sleep_analysis {
            let _ = writeln!(
                out,
                "- {}: {:.1} hours (Quality: {})",
                ymd(sleep.date),
                round1(sleep.sleep_hours),
                sleep.sleep_quality
            );
        }
        if let Some(avg) = snapshot.average_sleep_hours() {
            let _ = writeln!(out, "- Average: {:.1} hours/night", round1(avg));
        }
        out.push('\n');
    }

    // Fall history
    if snapshot.fall_history.is_empty() {
        let _ = writeln!(out, "{}", NO_FALLS_LINE);
        out.push('\n');
    } else {
        let _ = writeln!(out, "FALL HISTORY (Recent acknowledged falls):");
        for fall in &snapshot.fall_history {
            let _ = writeln!(
                out,
                "- {}: {} fall in {}",
                clock(&fall.timestamp),
                fall.severity,
                fall.location
            );
        }
        out.push('\n');
    }

    // Wellness trend
    if !snapshot.wellness_scores.is_empty() {
        let _ = writeln!(out, "WELLNESS TRENDS (Past 7 days):");
        for wellness in &snapshot.wellness_scores {
            let _ = writeln!(out, "- {}: {}/100", ymd(wellness.date), wellness.score);
        }
        if let Some(avg) = snapshot.average_wellness() {
            let _ = writeln!(out, "- Average: {:.1}/100", round1(avg));
        }
        out.push('\n');
    }

    out
}
