//! In-Memory Store
//!
//! A process-local `DocumentStore` used by tests and credential-less demo
//! runs. Collections live in a `RwLock`ed map; every mutation notifies a
//! broadcast channel, and watch tasks re-evaluate their query on each
//! notification, emitting only when the result set actually changed.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, mpsc, RwLock};

use super::client::{DocumentStore, StoreError, StoreResult};
use super::document::Document;
use super::query::{compare_values, Direction, Query};
use super::subscription::{Subscription, WATCH_CHANNEL_CAPACITY};

/// Broadcast depth for change notifications; laggards re-evaluate anyway.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory document store with push-based watches
#[derive(Clone)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
    changes: broadcast::Sender<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    /// Add a document under a generated id, like the upstream client's
    /// auto-id create. Returns the new id.
    pub async fn add(&self, collection: &str, fields: Value) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert(collection, &id, fields).await;
        id
    }

    /// Insert or replace a document.
    pub async fn insert(&self, collection: &str, id: &str, fields: Value) {
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), fields);
        }
        self.notify(collection);
    }

    fn notify(&self, collection: &str) {
        // No receivers is fine: nothing is watching yet.
        let _ = self.changes.send(collection.to_string());
    }

    async fn read_document(&self, collection: &str, id: &str) -> Option<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone()))
    }

    async fn eval_query(&self, query: &Query) -> Vec<Document> {
        let collections = self.collections.read().await;
        let mut matched: Vec<Document> = collections
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| query.matches(fields))
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, direction)) = &query.order_by {
            matched.sort_by(|a, b| {
                let ordering = match (a.get(field), b.get(field)) {
                    (Some(av), Some(bv)) => {
                        compare_values(av, bv).unwrap_or(std::cmp::Ordering::Equal)
                    }
                    // Documents without the ordering field sort last.
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                let ordering = match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                };
                ordering.then_with(|| a.id.cmp(&b.id))
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        matched
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.read_document(collection, id).await)
    }

    async fn run_query(&self, query: &Query) -> StoreResult<Vec<Document>> {
        Ok(self.eval_query(query).await)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> StoreResult<()> {
        {
            let mut collections = self.collections.write().await;
            let docs = collections
                .get_mut(collection)
                .ok_or_else(|| StoreError::not_found(format!("{}/{}", collection, id)))?;
            let existing = docs
                .get_mut(id)
                .ok_or_else(|| StoreError::not_found(format!("{}/{}", collection, id)))?;
            match existing {
                Value::Object(map) => {
                    for (key, value) in fields {
                        map.insert(key.clone(), value.clone());
                    }
                }
                other => {
                    *other = Value::Object(fields.clone());
                }
            }
        }
        self.notify(collection);
        Ok(())
    }

    async fn watch_document(
        &self,
        collection: &str,
        id: &str,
    ) -> StoreResult<Subscription<Option<Document>>> {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        // Subscribe before the initial read so no change slips between them.
        let mut changes = self.changes.subscribe();
        let store = self.clone();
        let collection = collection.to_string();
        let id = id.to_string();

        let task = tokio::spawn(async move {
            let mut last = store.read_document(&collection, &id).await;
            if tx.send(last.clone()).await.is_err() {
                return;
            }
            loop {
                match changes.recv().await {
                    Ok(changed) if changed != collection => continue,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                let next = store.read_document(&collection, &id).await;
                if next != last {
                    last = next.clone();
                    if tx.send(next).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }

    async fn watch_query(&self, query: &Query) -> StoreResult<Subscription<Vec<Document>>> {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let mut changes = self.changes.subscribe();
        let store = self.clone();
        let query = query.clone();

        let task = tokio::spawn(async move {
            let mut last = store.eval_query(&query).await;
            if tx.send(last.clone()).await.is_err() {
                return;
            }
            loop {
                match changes.recv().await {
                    Ok(changed) if changed != query.collection => continue,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                let next = store.eval_query(&query).await;
                if next != last {
                    last = next.clone();
                    if tx.send(next).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }
}
