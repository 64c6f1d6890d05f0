//! Type-safe resource identifier.
//!
//! [`ResourceId`] is a newtype around the backend's identifier string
//! (a Mongo-style `_id`), so identifiers cannot be confused with field
//! values or paths.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable unique identifier of an advertiser, campaign, plan, or reward.
///
/// Used as the key of the per-identifier mutation lock and to locate rows
/// for optimistic patches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a `ResourceId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reads an identifier out of a JSON value. Strings are taken as-is,
    /// integers are rendered in decimal; anything else yields `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}
