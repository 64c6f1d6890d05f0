//! Opaque resource records.
//!
//! A [`Record`] is whatever JSON object the backend returned for a row.
//! Only the identifier field is interpreted; every other field is carried
//! through untouched for presentation code to format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ResourceId;

/// One row of an advertiser, campaign, plan, or reward listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Converts a JSON value into a record. Non-objects yield `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Reads the identifier stored under `id_field`.
    #[must_use]
    pub fn id(&self, id_field: &str) -> Option<ResourceId> {
        self.0.get(id_field).and_then(ResourceId::from_json)
    }

    /// Returns the raw value of `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns `field` as a string slice, if it is one.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Writes `value` into `field`, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Writes every field of `patch` into the record.
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        for (k, v) in patch {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Borrow the underlying object.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the record, returning the JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn campaign() -> Record {
        let Some(record) = Record::from_value(json!({
            "_id": "c1",
            "name": "NotaAI",
            "status": "pending",
        })) else {
            panic!("object expected");
        };
        record
    }

    #[test]
    fn id_reads_configured_field() {
        let record = campaign();
        assert_eq!(record.id("_id"), Some(ResourceId::from("c1")));
        assert_eq!(record.id("id"), None);
    }

    #[test]
    fn set_returns_previous_value() {
        let mut record = campaign();
        let previous = record.set("status", json!("approved"));
        assert_eq!(previous, Some(json!("pending")));
        assert_eq!(record.get_str("status"), Some("approved"));
    }

    #[test]
    fn merge_overwrites_and_adds() {
        let mut record = campaign();
        let Value::Object(patch) = json!({"status": "paused", "budgetTotal": 500}) else {
            panic!("object expected");
        };
        record.merge(&patch);
        assert_eq!(record.get_str("status"), Some("paused"));
        assert_eq!(record.get("budgetTotal"), Some(&json!(500)));
        assert_eq!(record.get_str("name"), Some("NotaAI"));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("x")).is_none());
    }
}
