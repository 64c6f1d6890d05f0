//! Query building: UI filter/sort/pagination state → request parameters.
//!
//! [`QueryBuilder::build`] is pure and total. Parameter order is filters
//! (insertion order), then `page`/`limit`, then `sortBy`/`sortOrder`.

use serde::{Deserialize, Serialize};

use crate::domain::{FilterState, PaginationState, Sort};

/// Everything that determines which rows a list shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Resource-specific filters.
    pub filters: FilterState,
    /// Sort; sent on every request when present.
    pub sort: Option<Sort>,
    /// Page position; `None` for unpaginated resources.
    pub pagination: Option<PaginationState>,
}

impl ListQuery {
    /// Query with no filters, no sort, and the given pagination.
    #[must_use]
    pub fn paged(pagination: PaginationState) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::default()
        }
    }

    /// Builder: replace the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    /// Builder: replace the sort.
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Ordered, possibly repeated, query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `key=value` pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterates over all pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Appends the pairs to `url`'s query string, form-encoded.
    pub fn apply_to(&self, url: &mut reqwest::Url) {
        if self.pairs.is_empty() {
            return;
        }
        let mut qp = url.query_pairs_mut();
        for (k, v) in &self.pairs {
            qp.append_pair(k, v);
        }
    }
}

/// Turns [`ListQuery`] state into [`RequestParams`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Builds the request parameters for `query`.
    ///
    /// - empty filters are omitted;
    /// - multi-valued filters become repeated `key[]` pairs;
    /// - `page` is one-based, `limit` is the page size;
    /// - `sortBy`/`sortOrder` are always sent when a sort is set.
    #[must_use]
    pub fn build(query: &ListQuery) -> RequestParams {
        let mut params = RequestParams::new();

        for (key, value) in query.filters.iter() {
            let values = value.to_param_values();
            if value.is_multi() {
                let key = if key.ends_with("[]") {
                    key.to_string()
                } else {
                    format!("{key}[]")
                };
                for v in values {
                    params.push(key.clone(), v);
                }
            } else if let Some(v) = values.into_iter().next() {
                params.push(key, v);
            }
        }

        if let Some(pagination) = query.pagination {
            params.push("page", pagination.server_page().to_string());
            params.push("limit", pagination.page_size().to_string());
        }

        if let Some(sort) = &query.sort {
            params.push("sortBy", sort.sort_by.clone());
            params.push("sortOrder", sort.sort_order.as_str());
        }

        params
    }
}
