//! Pagination state and paged results.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered by the dashboard grids.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [5, 10, 25];

/// Zero-based page position as held by the UI.
///
/// The remote API is one-based: [`PaginationState::server_page`] performs
/// the translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    page: u32,
    page_size: u32,
}

impl PaginationState {
    /// Creates a pagination state.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] if `page_size` is zero.
    pub fn new(page: u32, page_size: u32) -> Result<Self, SyncError> {
        if page_size == 0 {
            return Err(SyncError::Validation(
                "page size must be positive".to_string(),
            ));
        }
        Ok(Self { page, page_size })
    }

    /// First page with the given size, falling back to
    /// [`DEFAULT_PAGE_SIZE`] when `page_size` is zero.
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// One-based page number sent to the server.
    #[must_use]
    pub const fn server_page(&self) -> u32 {
        self.page.saturating_add(1)
    }

    /// Same page size, different page.
    #[must_use]
    pub const fn with_page(self, page: u32) -> Self {
        Self {
            page,
            page_size: self.page_size,
        }
    }

    /// Number of pages needed for `total` rows.
    #[must_use]
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size))
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// One page of rows plus the size of the full matching set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    /// Rows in server order.
    pub rows: Vec<T>,
    /// Size of the full matching set, independent of the page.
    pub total_count: u64,
}

impl<T> ListResult<T> {
    /// Creates a result from rows and a total.
    #[must_use]
    pub fn new(rows: Vec<T>, total_count: u64) -> Self {
        Self { rows, total_count }
    }

    /// Result whose total is its own row count (unpaginated resources).
    #[must_use]
    pub fn complete(rows: Vec<T>) -> Self {
        let total_count = rows.len() as u64;
        Self { rows, total_count }
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(PaginationState::new(0, 0).is_err());
        assert!(PaginationState::new(3, 25).is_ok());
    }

    #[test]
    fn server_page_is_one_based() {
        for page in [0_u32, 1, 2, 41, 1000] {
            let Ok(p) = PaginationState::new(page, 10) else {
                panic!("valid pagination");
            };
            assert_eq!(p.server_page(), page + 1);
        }
    }

    #[test]
    fn server_page_saturates() {
        let Ok(p) = PaginationState::new(u32::MAX, 10) else {
            panic!("valid pagination");
        };
        assert_eq!(p.server_page(), u32::MAX);
    }

    #[test]
    fn page_count_rounds_up() {
        let p = PaginationState::first(10);
        assert_eq!(p.page_count(0), 0);
        assert_eq!(p.page_count(57), 6);
        assert_eq!(p.page_count(60), 6);
    }

    #[test]
    fn complete_uses_row_count() {
        let result = ListResult::complete(vec![1, 2, 3]);
        assert_eq!(result.total_count, 3);
    }
}
