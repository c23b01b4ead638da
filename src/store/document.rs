//! Documents
//!
//! A schemaless record as the store returns it: an id plus a JSON field
//! tree, with typed accessors tolerant of the store's loose value encodings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::time::parse_instant;

/// A record fetched from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned document id
    pub id: String,
    /// The record's fields as plain JSON
    pub fields: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Raw field access
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn f64_field(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Parse an instant field from any of the store's timestamp encodings.
    pub fn timestamp_field(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(parse_instant)
    }
}
