//! Query Builder
//!
//! Structural queries over a collection: equality and range filters, one
//! ordering, and a result limit. This mirrors the subset of the external
//! store's query surface the services actually use.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction for `order_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

/// A single field predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Eq(Value),
    Gte(Value),
    Lte(Value),
}

/// A named-field filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub condition: Condition,
}

/// A (collection, filters, ordering, limit) tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    /// Start a query over a collection
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Require `field == value`
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            condition: Condition::Eq(value.into()),
        });
        self
    }

    /// Require `field >= value`
    pub fn where_gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            condition: Condition::Gte(value.into()),
        });
        self
    }

    /// Require `field <= value`
    pub fn where_lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            condition: Condition::Lte(value.into()),
        });
        self
    }

    /// Order results by a field
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Cap the number of results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document's fields satisfy every filter.
    pub fn matches(&self, fields: &Value) -> bool {
        self.filters.iter().all(|filter| {
            let actual = fields.get(&filter.field);
            match &filter.condition {
                Condition::Eq(expected) => actual == Some(expected),
                Condition::Gte(bound) => actual
                    .and_then(|a| compare_values(a, bound))
                    .map(|ord| ord != Ordering::Less)
                    .unwrap_or(false),
                Condition::Lte(bound) => actual
                    .and_then(|a| compare_values(a, bound))
                    .map(|ord| ord != Ordering::Greater)
                    .unwrap_or(false),
            }
        })
    }
}

/// Order two field values the way the store does: numbers numerically,
/// strings lexicographically (which is date order for `YYYY-MM-DD` keys).
/// Mixed types are incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64()?, b.as_f64()?);
            a.partial_cmp(&b)
        }
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
