//! Controllers for every dashboard screen, wired to one fetcher and one
//! notification bus.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::domain::{AnalyticsReport, Notifier};
use crate::error::SyncError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::resource::ResourceConfig;
use crate::service::{ListDataController, MutationController, ReportController, SessionService};

/// List and mutation controllers of one resource.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    /// Read side.
    pub list: Arc<ListDataController>,
    /// Write side.
    pub mutations: Arc<MutationController>,
}

/// Shared state handed to the UI shell.
#[derive(Debug, Clone)]
pub struct AppState {
    /// One handle per bundled resource.
    pub resources: Vec<ResourceHandle>,
    /// Analytics screen.
    pub report: Arc<ReportController>,
    /// Login state.
    pub session: Arc<SessionService>,
    /// Notification bus shared by all controllers.
    pub notifier: Notifier,
}

impl AppState {
    /// Builds an [`HttpFetcher`] from `config` and wires every controller to
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SyncError> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config)?);
        Ok(Self::with_fetcher(fetcher, config))
    }

    /// Wires every bundled resource, the analytics report, and the session
    /// to `fetcher`.
    #[must_use]
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: &ClientConfig) -> Self {
        let notifier = Notifier::new(config.notification_capacity);
        let resources = ResourceConfig::builtin()
            .into_iter()
            .map(|resource| {
                let list = Arc::new(ListDataController::new(
                    resource,
                    Arc::clone(&fetcher),
                    notifier.clone(),
                    config.default_page_size,
                ));
                let mutations = Arc::new(MutationController::new(Arc::clone(&list)));
                ResourceHandle { list, mutations }
            })
            .collect();
        let report = Arc::new(
            ReportController::new(Arc::clone(&fetcher), notifier.clone())
                .with_fallback(AnalyticsReport::sample()),
        );
        let session = Arc::new(SessionService::new(fetcher, notifier.clone()));
        Self {
            resources,
            report,
            session,
            notifier,
        }
    }

    /// Handle of the resource named `name` (e.g. `"campaigns"`).
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&ResourceHandle> {
        self.resources
            .iter()
            .find(|h| h.list.resource().name == name)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;

    #[test]
    fn every_builtin_resource_is_wired() {
        let state = AppState::with_fetcher(
            Arc::new(MockFetcher::new()),
            &ClientConfig::new("http://localhost"),
        );
        for name in ["advertisers", "campaigns", "plans", "rewards"] {
            assert!(state.resource(name).is_some(), "{name} missing");
        }
        assert!(state.resource("invoices").is_none());
    }

    #[tokio::test]
    async fn page_size_comes_from_config() {
        let mut config = ClientConfig::new("http://localhost");
        config.default_page_size = 25;
        let state = AppState::with_fetcher(Arc::new(MockFetcher::new()), &config);
        let Some(campaigns) = state.resource("campaigns") else {
            panic!("campaigns wired");
        };
        let query = campaigns.list.query().await;
        assert_eq!(query.pagination.map(|p| p.page_size()), Some(25));
    }
}
