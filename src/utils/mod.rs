//! Utilities
//!
//! Cross-cutting helpers: error types and calendar math.

pub mod error;
pub mod time;

pub use error::{AppError, AppResult};
