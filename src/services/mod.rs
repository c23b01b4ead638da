//! Services
//!
//! Business logic over the store and completion collaborators: live
//! subscription views, the analytics aggregator and formatter, the
//! completion provider seam, and the assistant request path.

pub mod analytics;
pub mod assistant;
pub mod live;
pub mod llm;

pub use analytics::AnalyticsService;
pub use assistant::{AssistantError, AssistantService};
pub use live::LiveMonitor;
pub use llm::{GeminiProvider, TextCompletion};
