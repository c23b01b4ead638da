//! Document Store
//!
//! The external document/query store seam: the `DocumentStore` trait, its
//! query/document/subscription vocabulary, and two implementations — the
//! Firestore REST client and an in-memory store for tests and demos.

pub mod client;
pub mod document;
pub mod firestore;
pub mod memory;
pub mod query;
pub mod subscription;

pub use client::{parse_http_error, DocumentStore, StoreError, StoreResult};
pub use document::Document;
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;
pub use query::{Condition, Direction, Filter, Query};
pub use subscription::Subscription;

/// Collection names shared by all store backends
pub mod collections {
    /// One status document per patient, keyed by patient id
    pub const PATIENT_STATUS: &str = "patientStatus";
    /// One summary document per (patient, day)
    pub const DAILY_SUMMARIES: &str = "dailySummaries";
    /// Alerts raised by the upstream detection system
    pub const ALERTS: &str = "alerts";
}
