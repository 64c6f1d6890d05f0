//! Domain layer: query state, records, mutations, and notifications.
//!
//! This module contains the client-side model shared by every dashboard
//! screen: filter/sort/pagination state, opaque resource records and their
//! identifiers, the optimistic mutation lifecycle, request generations,
//! and the notification bus.

pub mod analytics;
pub mod filter;
pub mod generation;
pub mod mutation;
pub mod notification;
pub mod notifier;
pub mod pagination;
pub mod record;
pub mod resource_id;

pub use analytics::AnalyticsReport;
pub use filter::{FilterState, FilterValue, Sort, SortOrder};
pub use generation::Generation;
pub use mutation::{MutationPhase, MutationRequest, OptimisticPatch, RowSnapshot};
pub use notification::{Notification, Severity};
pub use notifier::Notifier;
pub use pagination::{ListResult, PaginationState};
pub use record::Record;
pub use resource_id::ResourceId;
