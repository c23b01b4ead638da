//! Document Store Trait
//!
//! The seam between the services and the external document/query store.
//! Services receive an explicitly constructed `Arc<dyn DocumentStore>`
//! rather than reaching for a process-wide handle, so any implementation
//! (REST-backed or in-memory) can stand in.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::document::Document;
use super::query::Query;
use super::subscription::Subscription;

/// Errors surfaced by store operations
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The caller lacks access to the collection or document
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A targeted document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The store returned a payload that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The store rejected the query shape
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The store connection or watch has been closed
    #[error("Store closed: {0}")]
    Closed(String),
}

impl StoreError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Map an HTTP status from the store's REST surface to a `StoreError`.
pub fn parse_http_error(status: u16, body: &str) -> StoreError {
    match status {
        401 | 403 => StoreError::PermissionDenied(body.to_string()),
        404 => StoreError::NotFound(body.to_string()),
        400 => StoreError::InvalidQuery(body.to_string()),
        _ => StoreError::Network(format!("HTTP {}: {}", status, body)),
    }
}

/// The external document/query store contract.
///
/// Watches deliver the current value immediately, then once per change.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by id; `Ok(None)` when it does not exist.
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Run a structural query and return the matching snapshot.
    async fn run_query(&self, query: &Query) -> StoreResult<Vec<Document>>;

    /// Merge `fields` into an existing document, leaving other fields
    /// untouched. Fails with `NotFound` when the document is absent.
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> StoreResult<()>;

    /// Watch one document for changes.
    async fn watch_document(
        &self,
        collection: &str,
        id: &str,
    ) -> StoreResult<Subscription<Option<Document>>>;

    /// Watch a query's result set for changes.
    async fn watch_query(&self, query: &Query) -> StoreResult<Subscription<Vec<Document>>>;
}
