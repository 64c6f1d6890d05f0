//! User-facing notifications emitted by the controllers.
//!
//! Every controller outcome the user should see (a confirmed status change,
//! a failed load, a rejected form) becomes a [`Notification`] published
//! through the [`super::Notifier`]. The UI shell renders them as toasts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{FailureKind, SyncError};

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Operation confirmed by the server.
    Success,
    /// Informational message.
    Info,
    /// Input problem caught before anything was sent.
    Warning,
    /// Transport or logical failure.
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Unique notification id (UUID v4).
    pub id: Uuid,
    /// Severity.
    pub severity: Severity,
    /// Human-readable text.
    pub message: String,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification with the given severity.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Warning notification.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Builds the notification for a failed `action` (e.g. `"update status"`).
    ///
    /// Validation problems become warnings with the validation text; server
    /// and transport failures become errors that embed the server message.
    #[must_use]
    pub fn failure(action: &str, err: &SyncError) -> Self {
        let detail = err.user_message();
        match err.kind() {
            FailureKind::Validation => Self::warning(detail),
            FailureKind::Transport | FailureKind::Logical => {
                if detail.trim().is_empty() {
                    Self::error(format!("Failed to {action}"))
                } else {
                    Self::error(format!("Failed to {action}: {detail}"))
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ResourceId;

    #[test]
    fn failure_embeds_server_message() {
        let n = Notification::failure(
            "update status",
            &SyncError::Logical("Campaign locked".into()),
        );
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(n.message, "Failed to update status: Campaign locked");
    }

    #[test]
    fn failure_without_message_is_generic() {
        let n = Notification::failure("delete plan", &SyncError::Logical(String::new()));
        assert_eq!(n.message, "Failed to delete plan");
    }

    #[test]
    fn validation_failures_are_warnings() {
        let n = Notification::failure("update status", &SyncError::Busy(ResourceId::from("c1")));
        assert_eq!(n.severity, Severity::Warning);
    }

    #[test]
    fn serializes_severity_snake_case() {
        let n = Notification::success("Plan created successfully!");
        let Ok(json) = serde_json::to_value(&n) else {
            panic!("serialization failed");
        };
        assert_eq!(json["severity"], "success");
    }
}
