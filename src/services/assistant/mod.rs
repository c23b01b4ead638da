//! Assistant
//!
//! The AI request path: prompt assembly over the analytics report and the
//! completion call, with failures surfaced as in-band reply text.

pub mod prompts;
pub mod service;

pub use service::{AssistantError, AssistantService};
