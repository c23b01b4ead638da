//! Analytics
//!
//! The on-demand aggregation path: fan-out reads with per-read fallbacks,
//! the merged snapshot, and its plain-text serialization.

pub mod fallback;
pub mod formatter;
pub mod service;

pub use formatter::{format_for_ai, NO_DATA_SENTINEL, NO_FALLS_LINE};
pub use service::AnalyticsService;
