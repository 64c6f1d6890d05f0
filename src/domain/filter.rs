//! Filter and sort state for list queries.
//!
//! [`FilterState`] keeps filters in insertion order so the outgoing query
//! string is stable. Empty values are kept in the state (the UI still shows
//! them) but never serialized; see [`FilterValue::is_empty`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// Free text or an enumerated choice (e.g. campaign `type`).
    Text(String),
    /// Numeric bound (e.g. `minBudget`).
    Number(f64),
    /// Calendar date, sent as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Multi-select, sent as one repeated `key[]` parameter per value.
    Multi(Vec<String>),
}

impl FilterValue {
    /// Returns `true` if the value must be left out of the request.
    ///
    /// Blank text, non-finite numbers, and empty selections count as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => !n.is_finite(),
            Self::Date(_) => false,
            Self::Multi(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }

    /// Serialized parameter values, in order. Empty for empty filters.
    #[must_use]
    pub fn to_param_values(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }
        match self {
            Self::Text(s) => vec![s.trim().to_string()],
            Self::Number(n) => vec![n.to_string()],
            Self::Date(d) => vec![d.format("%Y-%m-%d").to_string()],
            Self::Multi(values) => values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns `true` for multi-valued filters.
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multi(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered mapping from filter key to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    entries: Vec<(String, FilterValue)>,
}

impl FilterState {
    /// Creates an empty filter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Builder-style [`FilterState::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` when `value` is `Some`, removes it otherwise.
    pub fn set_opt<V: Into<FilterValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        let key = key.into();
        match value {
            Some(v) => self.set(key, v),
            None => {
                self.remove(&key);
            }
        }
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates over all entries in insertion order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drops every filter.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no filter is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Wire representation (`"asc"` / `"desc"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Sort key and direction. Always sent when present on a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Server-side field to sort by.
    pub sort_by: String,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl Sort {
    /// Creates a sort on `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            sort_by: field.into(),
            sort_order: order,
        }
    }
}
