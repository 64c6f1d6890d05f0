//! # adboard-sync
//!
//! Data-sync controllers for the advertising platform admin dashboard.
//!
//! Every dashboard screen (advertisers, campaigns, plans, rewards) follows
//! the same cycle: build query parameters from filter, sort and page state,
//! fetch a page of rows, and write changes back to the same REST API. This
//! crate implements that cycle once, parameterized by a per-resource
//! [`resource::ResourceConfig`].
//!
//! ## Architecture
//!
//! ```text
//! UI shell (filters, grids, dialogs)
//!     │
//!     ├── ListDataController ──┐   (service/)
//!     ├── MutationController ──┤
//!     ├── ReportController ────┤
//!     ├── SessionService ──────┤
//!     │                        │
//!     ├── QueryBuilder         │   (query)
//!     ├── Notifier ◄───────────┘   (domain/)
//!     │
//!     ├── Fetcher + envelope       (fetch/)
//!     │
//!     └── Remote REST API
//! ```
//!
//! Loads are ordered by issuance: a response is applied only if no newer
//! load was issued meanwhile. Field patches are optimistic and roll back to
//! an exact row snapshot on failure.

pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod format;
pub mod forms;
pub mod query;
pub mod resource;
pub mod service;
