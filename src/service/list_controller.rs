//! List controller: paginated/filterable rows for one resource.
//!
//! [`ListDataController`] owns the current page (`rows`, `total_count`)
//! and moves through `Idle → Loading → {Success, Error}`. Results are
//! applied in issuance order: a response is committed only if no newer load
//! was issued meanwhile. Failed loads keep the last good rows on screen.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::domain::{
    FilterState, Generation, ListResult, Notification, Notifier, PaginationState, Record,
    ResourceId, RowSnapshot, Sort,
};
use crate::error::SyncError;
use crate::fetch::{Fetcher, envelope};
use crate::query::{ListQuery, QueryBuilder};
use crate::resource::ResourceConfig;

/// Load lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing loaded yet.
    Idle,
    /// A load is outstanding.
    Loading,
    /// The latest load succeeded.
    Success,
    /// The latest load failed; rows are the last good ones (or the fallback).
    Error,
}

/// Result of a [`ListDataController::load`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was applied.
    Committed {
        /// Generation of the applied request.
        generation: u64,
        /// Rows now held.
        rows: usize,
        /// Total now held.
        total_count: u64,
    },
    /// A newer load was issued before this one finished; its result was
    /// discarded.
    Superseded {
        /// Generation of the discarded request.
        generation: u64,
    },
}

/// Read-only copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot {
    /// Load status.
    pub status: LoadStatus,
    /// Current rows.
    pub rows: Vec<Record>,
    /// Size of the full matching set.
    pub total_count: u64,
    /// Message of the latest failure, cleared by the next success.
    pub error: Option<String>,
    /// `true` while the configured fallback dataset is displayed.
    pub showing_fallback: bool,
    /// Incremented every time rows are replaced by a load.
    pub revision: u64,
    /// Query that produced (or is producing) the rows.
    pub query: ListQuery,
}

#[derive(Debug)]
struct ListState {
    status: LoadStatus,
    rows: Vec<Record>,
    total_count: u64,
    error: Option<String>,
    showing_fallback: bool,
    revision: u64,
}

impl ListState {
    fn replace(&mut self, result: ListResult<Record>) {
        self.rows = result.rows;
        self.total_count = result.total_count;
        self.revision = self.revision.saturating_add(1);
    }
}

/// Owner of one resource's list state.
pub struct ListDataController {
    resource: ResourceConfig,
    fetcher: Arc<dyn Fetcher>,
    notifier: Notifier,
    generation: Generation,
    query: RwLock<ListQuery>,
    state: RwLock<ListState>,
    fallback: Option<ListResult<Record>>,
}

impl fmt::Debug for ListDataController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDataController")
            .field("resource", &self.resource.name)
            .field("generation", &self.generation.latest())
            .field("has_fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

impl ListDataController {
    /// Creates an idle controller. Paginated resources start on the first
    /// page of `page_size` rows; the resource's default sort is preselected.
    #[must_use]
    pub fn new(
        resource: ResourceConfig,
        fetcher: Arc<dyn Fetcher>,
        notifier: Notifier,
        page_size: u32,
    ) -> Self {
        let query = ListQuery {
            filters: FilterState::new(),
            sort: resource.default_sort.clone(),
            pagination: resource
                .paginated
                .then(|| PaginationState::first(page_size)),
        };
        Self {
            resource,
            fetcher,
            notifier,
            generation: Generation::new(),
            query: RwLock::new(query),
            state: RwLock::new(ListState {
                status: LoadStatus::Idle,
                rows: Vec::new(),
                total_count: 0,
                error: None,
                showing_fallback: false,
                revision: 0,
            }),
            fallback: None,
        }
    }

    /// Dataset substituted when the list endpoint cannot be reached at all.
    /// The transport error is still recorded and notified.
    #[must_use]
    pub fn with_fallback(mut self, fallback: ListResult<Record>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Resource configuration.
    #[must_use]
    pub const fn resource(&self) -> &ResourceConfig {
        &self.resource
    }

    /// Shared fetcher.
    #[must_use]
    pub fn fetcher(&self) -> Arc<dyn Fetcher> {
        Arc::clone(&self.fetcher)
    }

    /// Notification bus.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Latest issued generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.latest()
    }

    /// Current query.
    pub async fn query(&self) -> ListQuery {
        self.query.read().await.clone()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ListSnapshot {
        let query = self.query.read().await.clone();
        let st = self.state.read().await;
        ListSnapshot {
            status: st.status,
            rows: st.rows.clone(),
            total_count: st.total_count,
            error: st.error.clone(),
            showing_fallback: st.showing_fallback,
            revision: st.revision,
            query,
        }
    }

    /// Loads the rows for `query`, making it the current query.
    ///
    /// Only the most recently issued load may change the state: if another
    /// load is issued before this one resolves, this one's result is
    /// discarded and [`LoadOutcome::Superseded`] is returned.
    ///
    /// # Errors
    ///
    /// Returns the transport or logical failure of this load when it is
    /// still the latest one. The failure is also recorded in the state and
    /// published as a notification; the previous rows are kept.
    pub async fn load(&self, query: ListQuery) -> Result<LoadOutcome, SyncError> {
        let generation = {
            let mut current = self.query.write().await;
            *current = query.clone();
            self.generation.issue()
        };

        {
            let mut st = self.state.write().await;
            if self.generation.is_current(generation) {
                st.status = LoadStatus::Loading;
            }
        }

        let params = QueryBuilder::build(&query);
        tracing::debug!(resource = %self.resource.name, generation, params = params.len(), "loading");

        let result = match self.fetcher.get(&self.resource.endpoints.list, &params).await {
            Ok(body) => envelope::parse_list(&self.resource.listing, body),
            Err(e) => Err(e),
        };

        let mut st = self.state.write().await;
        if !self.generation.is_current(generation) {
            tracing::debug!(
                resource = %self.resource.name,
                generation,
                latest = self.generation.latest(),
                "discarding stale response"
            );
            return Ok(LoadOutcome::Superseded { generation });
        }

        match result {
            Ok(list) => {
                if let Some(p) = query.pagination
                    && list.rows.len() > p.page_size() as usize
                {
                    tracing::warn!(
                        resource = %self.resource.name,
                        rows = list.rows.len(),
                        page_size = p.page_size(),
                        "server returned more rows than requested"
                    );
                }
                let rows = list.rows.len();
                let total_count = list.total_count;
                st.replace(list);
                st.status = LoadStatus::Success;
                st.error = None;
                st.showing_fallback = false;
                tracing::info!(resource = %self.resource.name, generation, rows, total_count, "list loaded");
                Ok(LoadOutcome::Committed {
                    generation,
                    rows,
                    total_count,
                })
            }
            Err(err) => {
                st.status = LoadStatus::Error;
                st.error = Some(err.user_message());
                if err.is_transport()
                    && let Some(fallback) = &self.fallback
                {
                    st.replace(fallback.clone());
                    st.showing_fallback = true;
                }
                tracing::warn!(
                    resource = %self.resource.name,
                    generation,
                    error = %err,
                    fallback = st.showing_fallback,
                    "list load failed"
                );
                drop(st);
                self.notifier.publish(Notification::failure(
                    &format!("load {}", self.resource.name),
                    &err,
                ));
                Err(err)
            }
        }
    }

    /// Re-runs the current query (retry and post-mutation refresh).
    ///
    /// # Errors
    ///
    /// See [`ListDataController::load`].
    pub async fn reload(&self) -> Result<LoadOutcome, SyncError> {
        let query = self.query().await;
        self.load(query).await
    }

    /// Replaces the filters and loads once. Paginated lists go back to the
    /// first page, since the old page may not exist in the new set.
    ///
    /// # Errors
    ///
    /// See [`ListDataController::load`].
    pub async fn set_filters(&self, filters: FilterState) -> Result<LoadOutcome, SyncError> {
        let mut query = self.query().await;
        query.filters = filters;
        query.pagination = query.pagination.map(|p| p.with_page(0));
        self.load(query).await
    }

    /// Replaces the sort and loads once.
    ///
    /// # Errors
    ///
    /// See [`ListDataController::load`].
    pub async fn set_sort(&self, sort: Sort) -> Result<LoadOutcome, SyncError> {
        let mut query = self.query().await;
        query.sort = Some(sort);
        self.load(query).await
    }

    /// Replaces the page position and loads once. Ignored for unpaginated
    /// resources apart from the reload.
    ///
    /// # Errors
    ///
    /// See [`ListDataController::load`].
    pub async fn set_pagination(
        &self,
        pagination: PaginationState,
    ) -> Result<LoadOutcome, SyncError> {
        let mut query = self.query().await;
        if self.resource.paginated {
            query.pagination = Some(pagination);
        }
        self.load(query).await
    }

    /// Returns `true` if a row with `id` is currently held.
    pub async fn contains(&self, id: &ResourceId) -> bool {
        let st = self.state.read().await;
        st.rows
            .iter()
            .any(|r| r.id(&self.resource.id_field).as_ref() == Some(id))
    }

    /// Writes `patch` into the row `id`, returning the pre-patch row.
    ///
    /// Returns `None` if the row is not in the current page.
    pub async fn apply_patch(
        &self,
        id: &ResourceId,
        patch: &Map<String, Value>,
    ) -> Option<RowSnapshot> {
        let mut st = self.state.write().await;
        let revision = st.revision;
        let row = st
            .rows
            .iter_mut()
            .find(|r| r.id(&self.resource.id_field).as_ref() == Some(id))?;
        let snapshot = RowSnapshot {
            resource_id: id.clone(),
            row: row.clone(),
            revision,
        };
        row.merge(patch);
        Some(snapshot)
    }

    /// Puts a pre-patch row back.
    ///
    /// Skipped (returns `false`) if a load replaced the rows after the
    /// snapshot was taken, or if the row is gone.
    pub async fn restore_row(&self, snapshot: RowSnapshot) -> bool {
        let mut st = self.state.write().await;
        if st.revision != snapshot.revision {
            tracing::debug!(
                resource = %self.resource.name,
                resource_id = %snapshot.resource_id,
                "rows reloaded since patch; skipping restore"
            );
            return false;
        }
        let Some(row) = st
            .rows
            .iter_mut()
            .find(|r| r.id(&self.resource.id_field).as_ref() == Some(&snapshot.resource_id))
        else {
            return false;
        };
        *row = snapshot.row;
        true
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{FilterValue, Severity, SortOrder};
    use crate::fetch::MockFetcher;
    use serde_json::json;

    fn controller(fetcher: MockFetcher, resource: ResourceConfig) -> ListDataController {
        ListDataController::new(resource, Arc::new(fetcher), Notifier::new(16), 10)
    }

    fn campaign_rows() -> Value {
        json!({
            "status": true,
            "campaigns": [
                {"_id": "c1", "status": "pending"},
                {"_id": "c2", "status": "approved"}
            ],
            "total": 57
        })
    }

    #[tokio::test]
    async fn new_starts_idle_on_first_page() {
        let ctl = controller(MockFetcher::new(), ResourceConfig::campaigns());
        let snap = ctl.snapshot().await;
        assert_eq!(snap.status, LoadStatus::Idle);
        assert_eq!(snap.query.pagination, Some(PaginationState::first(10)));
        assert!(snap.rows.is_empty());
    }

    #[tokio::test]
    async fn unpaginated_resources_have_no_pagination() {
        let ctl = controller(MockFetcher::new(), ResourceConfig::plans());
        assert_eq!(ctl.query().await.pagination, None);
    }

    #[tokio::test]
    async fn success_stores_rows_and_total() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .withf(|path, params| {
                path == "/admin/campaign/getAll"
                    && params.get("page") == Some("1")
                    && params.get("limit") == Some("10")
            })
            .times(1)
            .returning(|_, _| Ok(campaign_rows()));

        let ctl = controller(fetcher, ResourceConfig::campaigns());
        let outcome = ctl.reload().await;
        assert!(matches!(
            outcome,
            Ok(LoadOutcome::Committed {
                rows: 2,
                total_count: 57,
                ..
            })
        ));

        let snap = ctl.snapshot().await;
        assert_eq!(snap.status, LoadStatus::Success);
        assert_eq!(snap.total_count, 57);
        assert_eq!(snap.error, None);
        assert_eq!(snap.revision, 1);
    }

    #[tokio::test]
    async fn failure_keeps_last_good_rows() {
        let mut fetcher = MockFetcher::new();
        let mut seq = mockall::Sequence::new();
        fetcher
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(campaign_rows()));
        fetcher
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(SyncError::transport("connection refused")));

        let ctl = controller(fetcher, ResourceConfig::campaigns());
        let mut rx = ctl.notifier().subscribe();

        assert!(ctl.reload().await.is_ok());
        let Ok(next) = PaginationState::new(1, 10) else {
            panic!("valid pagination");
        };
        assert!(ctl.set_pagination(next).await.is_err());

        let snap = ctl.snapshot().await;
        assert_eq!(snap.status, LoadStatus::Error);
        assert_eq!(snap.rows.len(), 2);
        assert_eq!(snap.total_count, 57);
        assert_eq!(snap.error.as_deref(), Some("connection refused"));
        assert!(!snap.showing_fallback);

        let Ok(n) = rx.recv().await else {
            panic!("expected notification");
        };
        assert_eq!(n.severity, Severity::Error);
        assert!(n.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn logical_failure_uses_server_message() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(|_, _| Ok(json!({"status": false, "message": "Session expired"})));

        let ctl = controller(fetcher, ResourceConfig::plans());
        let result = ctl.reload().await;
        assert_eq!(result, Err(SyncError::Logical("Session expired".into())));
        assert_eq!(
            ctl.snapshot().await.error.as_deref(),
            Some("Session expired")
        );
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let mut fetcher = MockFetcher::new();
        let mut seq = mockall::Sequence::new();
        fetcher
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(SyncError::transport("timeout")));
        fetcher
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(campaign_rows()));

        let ctl = controller(fetcher, ResourceConfig::campaigns());
        assert!(ctl.reload().await.is_err());
        assert!(ctl.reload().await.is_ok());
        let snap = ctl.snapshot().await;
        assert_eq!(snap.status, LoadStatus::Success);
        assert_eq!(snap.error, None);
    }

    #[tokio::test]
    async fn fallback_and_error_on_transport_failure() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(|_, _| Err(SyncError::transport("network unreachable")));

        let Some(row) = Record::from_value(json!({"_id": "demo"})) else {
            panic!("object expected");
        };
        let ctl = controller(fetcher, ResourceConfig::campaigns())
            .with_fallback(ListResult::complete(vec![row]));

        assert!(ctl.reload().await.is_err());
        let snap = ctl.snapshot().await;
        assert_eq!(snap.status, LoadStatus::Error);
        assert!(snap.showing_fallback);
        assert_eq!(snap.rows.len(), 1);
        assert_eq!(snap.error.as_deref(), Some("network unreachable"));
    }

    #[tokio::test]
    async fn fallback_not_used_for_logical_failure() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(|_, _| Ok(json!({"status": false})));

        let ctl = controller(fetcher, ResourceConfig::campaigns())
            .with_fallback(ListResult::complete(Vec::new()));
        assert!(ctl.reload().await.is_err());
        assert!(!ctl.snapshot().await.showing_fallback);
    }

    #[tokio::test]
    async fn set_filters_resets_page_and_sends_filters() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .withf(|_, params| {
                params.get_all("status[]") == vec!["approved", "pending"]
                    && params.get("page") == Some("1")
                    && params.get("sortBy") == Some("createdAt")
            })
            .times(1)
            .returning(|_, _| Ok(campaign_rows()));

        let resource = ResourceConfig::campaigns()
            .with_default_sort(Sort::new("createdAt", SortOrder::Desc));
        let ctl = controller(fetcher, resource);
        let filters = FilterState::new().with("status", FilterValue::from(vec!["approved", "pending"]));
        assert!(ctl.set_filters(filters).await.is_ok());
    }

    #[tokio::test]
    async fn patch_and_restore_row() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_get().returning(|_, _| Ok(campaign_rows()));
        let ctl = controller(fetcher, ResourceConfig::campaigns());
        assert!(ctl.reload().await.is_ok());
        let before = ctl.snapshot().await.rows;

        let Value::Object(patch) = json!({"status": "approved"}) else {
            panic!("object expected");
        };
        let id = ResourceId::from("c1");
        let Some(snapshot) = ctl.apply_patch(&id, &patch).await else {
            panic!("row should exist");
        };
        let patched = ctl.snapshot().await.rows;
        assert_eq!(
            patched.first().and_then(|r| r.get_str("status")),
            Some("approved")
        );

        assert!(ctl.restore_row(snapshot).await);
        assert_eq!(ctl.snapshot().await.rows, before);
    }

    #[tokio::test]
    async fn restore_skipped_after_reload() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_get().returning(|_, _| Ok(campaign_rows()));
        let ctl = controller(fetcher, ResourceConfig::campaigns());
        assert!(ctl.reload().await.is_ok());

        let Value::Object(patch) = json!({"status": "paused"}) else {
            panic!("object expected");
        };
        let Some(snapshot) = ctl.apply_patch(&ResourceId::from("c2"), &patch).await else {
            panic!("row should exist");
        };
        assert!(ctl.reload().await.is_ok());
        assert!(!ctl.restore_row(snapshot).await);
    }

    #[tokio::test]
    async fn apply_patch_unknown_row_is_none() {
        let ctl = controller(MockFetcher::new(), ResourceConfig::campaigns());
        let Value::Object(patch) = json!({"status": "paused"}) else {
            panic!("object expected");
        };
        assert!(ctl.apply_patch(&ResourceId::from("nope"), &patch).await.is_none());
    }
}
