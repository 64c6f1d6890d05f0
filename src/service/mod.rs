//! Service layer: the controllers the dashboard screens drive.
//!
//! [`ListDataController`] owns one resource's rows, [`MutationController`]
//! writes to that resource and refreshes or patches the list,
//! [`ReportController`] owns the analytics document, and [`SessionService`]
//! signs the administrator in. All of them publish outcomes through the
//! [`crate::domain::Notifier`].

pub mod in_flight;
pub mod list_controller;
pub mod mutation_controller;
pub mod report_controller;
pub mod session;

pub use in_flight::{InFlight, InFlightGuard};
pub use list_controller::{ListDataController, ListSnapshot, LoadOutcome, LoadStatus};
pub use mutation_controller::MutationController;
pub use report_controller::{ReportController, ReportSnapshot};
pub use session::{AdminUser, SessionService};
