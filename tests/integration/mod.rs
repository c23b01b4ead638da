//! Integration Tests Module
//!
//! End-to-end scenarios over the in-memory store and canned completion
//! providers: live subscriptions and acknowledgment, the aggregation
//! pipeline with degraded upstreams, and the assistant request path.

// Live subscription and acknowledgment scenarios
mod live_test;

// Aggregation, fallback, and formatting scenarios
mod analytics_test;

// Assistant prompt assembly and error surfacing scenarios
mod assistant_test;
