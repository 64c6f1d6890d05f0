//! Sync error types with failure-kind mapping.
//!
//! [`SyncError`] is the central error type for the crate. Every variant maps
//! onto one of the three user-facing failure kinds (see [`FailureKind`]) and
//! carries a message that can be shown to the user verbatim.

use crate::domain::ResourceId;

/// User-facing failure taxonomy.
///
/// | Kind       | Origin                                   | Retry            |
/// |------------|------------------------------------------|------------------|
/// | Transport  | network, timeout, non-2xx HTTP status    | explicit reload  |
/// | Logical    | well-formed response with `status: false`| explicit reload  |
/// | Validation | client-side, before any request is sent  | fix the input    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be completed at the HTTP level.
    Transport,
    /// The server answered but reported an application-level failure.
    Logical,
    /// The request was blocked before reaching the network.
    Validation,
}

/// Error enum shared by the fetcher, the controllers, and the session service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Network, timeout, or HTTP-level failure.
    #[error("{message}")]
    Transport {
        /// Server-supplied message if the error body carried one, otherwise
        /// the transport error text.
        message: String,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
    },

    /// Well-formed response whose payload signals failure (`status: false`).
    #[error("{0}")]
    Logical(String),

    /// Client-side validation rejected the input.
    #[error("{0}")]
    Validation(String),

    /// Another mutation for the same identifier is still in flight.
    #[error("a change to {0} is already in progress")]
    Busy(ResourceId),

    /// The response body did not have the configured shape.
    #[error("invalid response structure: {0}")]
    MalformedResponse(String),

    /// The resource configuration has no endpoint for this operation.
    #[error("{operation} is not supported for {resource}")]
    UnsupportedOperation {
        /// Resource name (e.g. `"advertisers"`).
        resource: String,
        /// Operation name (e.g. `"create"`).
        operation: &'static str,
    },

    /// Invalid client configuration (bad base URL, HTTP client setup).
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Builds a transport error without an HTTP status.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Returns the failure kind this error surfaces as.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } | Self::Config(_) => FailureKind::Transport,
            Self::Logical(_) | Self::MalformedResponse(_) => FailureKind::Logical,
            Self::Validation(_) | Self::Busy(_) | Self::UnsupportedOperation { .. } => {
                FailureKind::Validation
            }
        }
    }

    /// Returns `true` if the request never completed at the HTTP level.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind(), FailureKind::Transport)
    }

    /// Message suitable for a notification: the server's text when present,
    /// otherwise the error's own description.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { message, .. } | Self::Logical(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        if err.is_timeout() {
            tracing::warn!(reqwest_timeout = %err);
        } else if err.is_connect() {
            tracing::warn!(reqwest_connect = %err);
        } else if err.is_decode() {
            tracing::warn!(reqwest_decode = %err);
            return Self::MalformedResponse(err.to_string());
        } else if err.is_builder() {
            tracing::error!(reqwest_builder = %err);
            return Self::Config(err.to_string());
        } else {
            tracing::warn!(reqwest_error = %err);
        }
        Self::Transport {
            message: err.to_string(),
            status,
        }
    }
}

impl From<validator::ValidationErrors> for SyncError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| "is invalid".to_string());
                if field == "__all__" {
                    detail
                } else {
                    format!("{field} {detail}")
                }
            })
            .collect();
        fields.sort();
        Self::Validation(format!("please fix the form: {}", fields.join(", ")))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(SyncError::transport("down").kind(), FailureKind::Transport);
        assert_eq!(
            SyncError::Logical("Campaign locked".into()).kind(),
            FailureKind::Logical
        );
        assert_eq!(
            SyncError::Busy(ResourceId::from("x")).kind(),
            FailureKind::Validation
        );
        assert_eq!(
            SyncError::MalformedResponse("no rows".into()).kind(),
            FailureKind::Logical
        );
    }

    #[test]
    fn user_message_is_verbatim_for_server_errors() {
        let err = SyncError::Logical("Campaign locked".into());
        assert_eq!(err.user_message(), "Campaign locked");

        let err = SyncError::Transport {
            message: "Plan not found".into(),
            status: Some(404),
        };
        assert_eq!(err.user_message(), "Plan not found");
    }

    #[test]
    fn busy_message_names_identifier() {
        let err = SyncError::Busy(ResourceId::from("abc"));
        assert!(err.user_message().contains("abc"));
    }
}
