//! Report controller: the per-advertiser analytics document.
//!
//! Same load discipline as [`super::ListDataController`] (generation guard,
//! last good report kept on error) applied to a single document instead of
//! a row list.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::list_controller::{LoadOutcome, LoadStatus};
use crate::domain::{AnalyticsReport, FilterState, Generation, Notification, Notifier, ResourceId, Sort, SortOrder};
use crate::error::SyncError;
use crate::fetch::{Fetcher, envelope};
use crate::query::{ListQuery, QueryBuilder};
use crate::resource::resolve_template;

/// Analytics endpoint template.
pub const ANALYTICS_PATH: &str = "/admin/analytics/adv/analytics/{id}";

/// Response field holding the report.
const REPORT_FIELD: &str = "data";

/// Sort used when the caller does not choose one.
#[must_use]
pub fn default_report_sort() -> Sort {
    Sort::new("budgetUtilization", SortOrder::Asc)
}

/// Read-only copy of the report state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSnapshot {
    /// Load status.
    pub status: LoadStatus,
    /// Advertiser of the latest load.
    pub advertiser_id: Option<ResourceId>,
    /// Last good report, or the fallback.
    pub report: Option<AnalyticsReport>,
    /// Message of the latest failure.
    pub error: Option<String>,
    /// `true` while the fallback report is displayed.
    pub showing_fallback: bool,
}

/// Owner of the analytics report state.
pub struct ReportController {
    fetcher: Arc<dyn Fetcher>,
    notifier: Notifier,
    generation: Generation,
    state: RwLock<ReportSnapshot>,
    fallback: Option<AnalyticsReport>,
}

impl fmt::Debug for ReportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportController")
            .field("generation", &self.generation.latest())
            .field("has_fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

impl ReportController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, notifier: Notifier) -> Self {
        Self {
            fetcher,
            notifier,
            generation: Generation::new(),
            state: RwLock::new(ReportSnapshot {
                status: LoadStatus::Idle,
                advertiser_id: None,
                report: None,
                error: None,
                showing_fallback: false,
            }),
            fallback: None,
        }
    }

    /// Report substituted when the endpoint is unreachable.
    #[must_use]
    pub fn with_fallback(mut self, report: AnalyticsReport) -> Self {
        self.fallback = Some(report);
        self
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ReportSnapshot {
        self.state.read().await.clone()
    }

    /// Loads the report of `advertiser_id`.
    ///
    /// `sort` defaults to [`default_report_sort`]. Only the latest issued
    /// load may change the state.
    ///
    /// # Errors
    ///
    /// Returns the failure of this load when it is still the latest one. The
    /// previous report is kept, or replaced by the fallback on a transport
    /// failure; either way the error is recorded and notified.
    pub async fn load(
        &self,
        advertiser_id: &ResourceId,
        filters: FilterState,
        sort: Option<Sort>,
    ) -> Result<LoadOutcome, SyncError> {
        let generation = self.generation.issue();
        {
            let mut st = self.state.write().await;
            if self.generation.is_current(generation) {
                st.status = LoadStatus::Loading;
                st.advertiser_id = Some(advertiser_id.clone());
            }
        }

        let query = ListQuery {
            filters,
            sort: Some(sort.unwrap_or_else(default_report_sort)),
            pagination: None,
        };
        let params = QueryBuilder::build(&query);
        let path = resolve_template(ANALYTICS_PATH, Some(advertiser_id));

        let result = match self.fetcher.get(&path, &params).await {
            Ok(body) => envelope::parse_document::<AnalyticsReport>(body, REPORT_FIELD),
            Err(e) => Err(e),
        };

        let mut st = self.state.write().await;
        if !self.generation.is_current(generation) {
            tracing::debug!(generation, advertiser = %advertiser_id, "discarding stale report");
            return Ok(LoadOutcome::Superseded { generation });
        }

        match result {
            Ok(report) => {
                let rows = report.campaigns.len();
                let total_count = report.summary.total_campaigns;
                st.report = Some(report);
                st.status = LoadStatus::Success;
                st.error = None;
                st.showing_fallback = false;
                tracing::info!(generation, advertiser = %advertiser_id, rows, "report loaded");
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
                    st.report = Some(fallback.clone());
                    st.showing_fallback = true;
                }
                tracing::warn!(
                    generation,
                    advertiser = %advertiser_id,
                    error = %err,
                    fallback = st.showing_fallback,
                    "report load failed"
                );
                drop(st);
                self.notifier
                    .publish(Notification::failure("load analytics", &err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::FilterValue;
    use crate::fetch::MockFetcher;
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn sends_filters_and_default_sort() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .withf(|path, params| {
                path == "/admin/analytics/adv/analytics/adv42"
                    && params.get("startDate") == Some("2025-08-01")
                    && params.get("sortBy") == Some("budgetUtilization")
                    && params.get("sortOrder") == Some("asc")
                    && !params.contains("page")
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "status": true,
                    "data": {"summary": {"totalCampaigns": 3}, "campaigns": []}
                }))
            });

        let ctl = ReportController::new(Arc::new(fetcher), Notifier::new(8));
        let Some(start) = NaiveDate::from_ymd_opt(2025, 8, 1) else {
            panic!("valid date");
        };
        let filters = FilterState::new().with("startDate", FilterValue::Date(start));
        let outcome = ctl.load(&ResourceId::from("adv42"), filters, None).await;
        assert!(matches!(
            outcome,
            Ok(LoadOutcome::Committed { total_count: 3, .. })
        ));
        let snap = ctl.snapshot().await;
        assert_eq!(snap.status, LoadStatus::Success);
        assert_eq!(
            snap.report.map(|r| r.summary.total_campaigns),
            Some(3)
        );
    }

    #[tokio::test]
    async fn transport_failure_shows_sample_and_error() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_get()
            .returning(|_, _| Err(SyncError::transport("timed out")));

        let ctl = ReportController::new(Arc::new(fetcher), Notifier::new(8))
            .with_fallback(AnalyticsReport::sample());
        let mut rx = ctl.notifier.subscribe();

        assert!(
            ctl.load(&ResourceId::from("a"), FilterState::new(), None)
                .await
                .is_err()
        );
        let snap = ctl.snapshot().await;
        assert_eq!(snap.status, LoadStatus::Error);
        assert!(snap.showing_fallback);
        assert_eq!(snap.report, Some(AnalyticsReport::sample()));
        assert_eq!(snap.error.as_deref(), Some("timed out"));
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn logical_failure_keeps_previous_report() {
        let mut fetcher = MockFetcher::new();
        let mut seq = mockall::Sequence::new();
        fetcher
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(json!({"status": true, "data": {"summary": {"totalCampaigns": 1}}})));
        fetcher
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(json!({"status": false, "message": "Advertiser not found"})));

        let ctl = ReportController::new(Arc::new(fetcher), Notifier::new(8))
            .with_fallback(AnalyticsReport::sample());
        let id = ResourceId::from("a");
        assert!(ctl.load(&id, FilterState::new(), None).await.is_ok());
        assert!(ctl.load(&id, FilterState::new(), None).await.is_err());

        let snap = ctl.snapshot().await;
        assert!(!snap.showing_fallback);
        assert_eq!(snap.report.map(|r| r.summary.total_campaigns), Some(1));
        assert_eq!(snap.error.as_deref(), Some("Advertiser not found"));
    }
}
