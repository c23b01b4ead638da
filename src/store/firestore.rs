//! Firestore REST Store
//!
//! `DocumentStore` backed by the Firestore REST v1 surface: document GET,
//! `:runQuery` with a structured query, and field-masked PATCH updates.
//! The REST surface has no push channel, so watches poll on an interval
//! and emit when the observed value changes. Calls carry no timeout,
//! matching the upstream client's behavior.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::mpsc;
use tracing::warn;
use url::Url;

use super::client::{parse_http_error, DocumentStore, StoreError, StoreResult};
use super::document::Document;
use super::query::{Condition, Direction, Query};
use super::subscription::{Subscription, WATCH_CHANNEL_CAPACITY};

/// Default REST endpoint
const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com";

/// Default watch polling cadence
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Connection settings for the REST store
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Cloud project id
    pub project_id: String,
    /// API key appended to every request (demo-grade auth)
    pub api_key: Option<String>,
    /// Base URL override, for emulators
    pub base_url: Option<String>,
    /// Polling cadence for watches
    pub poll_interval: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: None,
            base_url: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Firestore-backed document store
#[derive(Clone)]
pub struct FirestoreStore {
    config: FirestoreConfig,
    client: reqwest::Client,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(FIRESTORE_API_URL)
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.base_url(),
            self.config.project_id
        )
    }

    fn url(&self, path: &str, extra_params: &[(String, String)]) -> StoreResult<Url> {
        let mut url = Url::parse(path).map_err(|e| StoreError::decode(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in extra_params {
                pairs.append_pair(key, value);
            }
            if let Some(api_key) = &self.config.api_key {
                pairs.append_pair("key", api_key);
            }
        }
        Ok(url)
    }

    /// Build the `structuredQuery` body for `:runQuery`.
    fn structured_query(query: &Query) -> Value {
        let mut body = json!({
            "from": [{ "collectionId": query.collection }],
        });

        let field_filters: Vec<Value> = query
            .filters
            .iter()
            .map(|filter| {
                let (op, value) = match &filter.condition {
                    Condition::Eq(v) => ("EQUAL", v),
                    Condition::Gte(v) => ("GREATER_THAN_OR_EQUAL", v),
                    Condition::Lte(v) => ("LESS_THAN_OR_EQUAL", v),
                };
                json!({
                    "fieldFilter": {
                        "field": { "fieldPath": filter.field },
                        "op": op,
                        "value": encode_value(value),
                    }
                })
            })
            .collect();

        match field_filters.len() {
            0 => {}
            1 => body["where"] = field_filters.into_iter().next().unwrap(),
            _ => {
                body["where"] = json!({
                    "compositeFilter": { "op": "AND", "filters": field_filters }
                });
            }
        }

        if let Some((field, direction)) = &query.order_by {
            let direction = match direction {
                Direction::Ascending => "ASCENDING",
                Direction::Descending => "DESCENDING",
            };
            body["orderBy"] = json!([{
                "field": { "fieldPath": field },
                "direction": direction,
            }]);
        }

        if let Some(limit) = query.limit {
            body["limit"] = json!(limit);
        }

        json!({ "structuredQuery": body })
    }

    async fn fetch_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let url = self.url(&format!("{}/{}/{}", self.documents_root(), collection, id), &[])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::network(e.to_string()))?;
        if status != 200 {
            return Err(parse_http_error(status, &body));
        }

        let rest_doc: RestDocument =
            serde_json::from_str(&body).map_err(|e| StoreError::decode(e.to_string()))?;
        Ok(Some(rest_doc.into_document()))
    }

    async fn fetch_query(&self, query: &Query) -> StoreResult<Vec<Document>> {
        let url = self.url(&format!("{}:runQuery", self.documents_root()), &[])?;
        let response = self
            .client
            .post(url)
            .json(&Self::structured_query(query))
            .send()
            .await
            .map_err(|e| StoreError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::network(e.to_string()))?;
        if status != 200 {
            return Err(parse_http_error(status, &body));
        }

        let rows: Vec<RunQueryRow> =
            serde_json::from_str(&body).map_err(|e| StoreError::decode(e.to_string()))?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(RestDocument::into_document)
            .collect())
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.fetch_document(collection, id).await
    }

    async fn run_query(&self, query: &Query) -> StoreResult<Vec<Document>> {
        self.fetch_query(query).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> StoreResult<()> {
        let mask: Vec<(String, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths".to_string(), key.clone()))
            .collect();
        let url = self.url(&format!("{}/{}/{}", self.documents_root(), collection, id), &mask)?;

        let encoded: Map<String, Value> = fields
            .iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect();

        let response = self
            .client
            .patch(url)
            .json(&json!({ "fields": encoded }))
            .send()
            .await
            .map_err(|e| StoreError::network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status, &body));
        }
        Ok(())
    }

    async fn watch_document(
        &self,
        collection: &str,
        id: &str,
    ) -> StoreResult<Subscription<Option<Document>>> {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let store = self.clone();
        let collection = collection.to_string();
        let id = id.to_string();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(store.config.poll_interval);
            let mut last: Option<Option<Document>> = None;
            loop {
                ticker.tick().await;
                let current = match store.fetch_document(&collection, &id).await {
                    Ok(doc) => doc,
                    Err(e) => {
                        warn!(collection = %collection, id = %id, error = %e, "document poll failed");
                        continue;
                    }
                };
                if last.as_ref() != Some(&current) {
                    last = Some(current.clone());
                    if tx.send(current).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }

    async fn watch_query(&self, query: &Query) -> StoreResult<Subscription<Vec<Document>>> {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let store = self.clone();
        let query = query.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(store.config.poll_interval);
            let mut last: Option<Vec<Document>> = None;
            loop {
                ticker.tick().await;
                let current = match store.fetch_query(&query).await {
                    Ok(docs) => docs,
                    Err(e) => {
                        warn!(collection = %query.collection, error = %e, "query poll failed");
                        continue;
                    }
                };
                if last.as_ref() != Some(&current) {
                    last = Some(current.clone());
                    if tx.send(current).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(Subscription::new(rx, task))
    }
}

/// A document as the REST surface returns it
#[derive(Debug, Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RestDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or(&self.name)
            .to_string();
        let fields: Map<String, Value> = self
            .fields
            .into_iter()
            .map(|(key, value)| (key, decode_value(&value)))
            .collect();
        Document::new(id, Value::Object(fields))
    }
}

#[derive(Debug, Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<RestDocument>,
}

/// Encode plain JSON into Firestore's typed-value form.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), encode_value(value)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Decode a Firestore typed value into plain JSON. Timestamps come back as
/// their RFC 3339 strings, which the model layer parses.
fn decode_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };
    if let Some((kind, inner)) = map.iter().next() {
        match kind.as_str() {
            "nullValue" => Value::Null,
            "booleanValue" => inner.clone(),
            "integerValue" => inner
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(|i| json!(i))
                .unwrap_or(Value::Null),
            "doubleValue" => inner.clone(),
            "stringValue" | "timestampValue" | "referenceValue" => inner.clone(),
            "arrayValue" => {
                let items = inner
                    .get("values")
                    .and_then(Value::as_array)
                    .map(|values| values.iter().map(decode_value).collect())
                    .unwrap_or_default();
                Value::Array(items)
            }
            "mapValue" => {
                let fields = inner
                    .get("fields")
                    .and_then(Value::as_object)
                    .map(|fields| {
                        fields
                            .iter()
                            .map(|(key, value)| (key.clone(), decode_value(value)))
                            .collect()
                    })
                    .unwrap_or_default();
                Value::Object(fields)
            }
            _ => Value::Null,
        }
    } else {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_codec_round_trip() {
        let original = json!({
            "patientId": "p1",
            "acknowledged": false,
            "confidenceScore": 0.97,
            "fallCount": 1,
            "roomMetrics": { "Living Room": { "timeInBedSeconds": 27000 } },
            "tags": ["fall", "urgent"]
        });
        let encoded = encode_value(&original);
        let decoded = decode_value(&encoded);
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_timestamp_value() {
        let decoded = decode_value(&json!({ "timestampValue": "2025-08-26T15:30:00Z" }));
        assert_eq!(decoded, json!("2025-08-26T15:30:00Z"));
    }

    #[test]
    fn test_structured_query_shape() {
        let query = Query::collection("alerts")
            .where_eq("patientId", "p1")
            .where_eq("acknowledged", true)
            .order_by("timestamp", Direction::Descending)
            .limit(10);
        let body = FirestoreStore::structured_query(&query);
        let sq = &body["structuredQuery"];
        assert_eq!(sq["from"][0]["collectionId"], "alerts");
        assert_eq!(sq["where"]["compositeFilter"]["op"], "AND");
        assert_eq!(
            sq["where"]["compositeFilter"]["filters"][0]["fieldFilter"]["op"],
            "EQUAL"
        );
        assert_eq!(sq["orderBy"][0]["direction"], "DESCENDING");
        assert_eq!(sq["limit"], 10);
    }

    #[test]
    fn test_structured_query_single_filter_is_not_composite() {
        let query = Query::collection("dailySummaries").where_gte("date", "2025-09-07");
        let body = FirestoreStore::structured_query(&query);
        let filter = &body["structuredQuery"]["where"]["fieldFilter"];
        assert_eq!(filter["op"], "GREATER_THAN_OR_EQUAL");
        assert_eq!(filter["value"]["stringValue"], "2025-09-07");
    }

    #[test]
    fn test_rest_document_id_from_name() {
        let rest_doc = RestDocument {
            name: "projects/demo/databases/(default)/documents/alerts/a1".to_string(),
            fields: Map::new(),
        };
        assert_eq!(rest_doc.into_document().id, "a1");
    }
}
