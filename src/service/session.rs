//! Admin login.
//!
//! The login endpoint sets a session cookie that the shared HTTP client
//! stores and replays, so the service only needs to remember who is signed
//! in.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use validator::Validate;

use crate::domain::{Notification, Notifier};
use crate::error::SyncError;
use crate::fetch::envelope::{self, GENERIC_FAILURE};
use crate::fetch::{Fetcher, WriteMethod};
use crate::forms::LoginRequest;

/// Login endpoint.
pub const LOGIN_PATH: &str = "/admin/auth/logIn";

/// Shown when a failed login carries no server message.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// The signed-in administrator, as returned by the login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminUser {
    /// Account identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Account email.
    pub email: String,
    /// Role, when the backend reports one.
    pub role: Option<String>,
}

/// Sign-in state for the dashboard.
pub struct SessionService {
    fetcher: Arc<dyn Fetcher>,
    notifier: Notifier,
    user: RwLock<Option<AdminUser>>,
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService").finish_non_exhaustive()
    }
}

impl SessionService {
    /// Creates a signed-out session.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, notifier: Notifier) -> Self {
        Self {
            fetcher,
            notifier,
            user: RwLock::new(None),
        }
    }

    /// Currently signed-in user.
    pub async fn current_user(&self) -> Option<AdminUser> {
        self.user.read().await.clone()
    }

    /// Validates the credentials and signs in.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Validation`] for a missing field or malformed email;
    ///   nothing is sent.
    /// - The transport or logical failure of the request.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AdminUser, SyncError> {
        if let Err(errors) = credentials.validate() {
            let err = SyncError::from(errors);
            self.notifier.publish(Notification::failure("log in", &err));
            return Err(err);
        }

        let body = serde_json::to_value(credentials)
            .map_err(|e| SyncError::Validation(e.to_string()))?;
        let result = self
            .fetcher
            .send(WriteMethod::Post, LOGIN_PATH, Some(body))
            .await
            .and_then(|body| envelope::parse_document::<AdminUser>(body, "user"));

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "signed in");
                *self.user.write().await = Some(user.clone());
                self.notifier
                    .publish(Notification::success("Login successful!"));
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign-in failed");
                self.notifier
                    .publish(Notification::error(login_failure_message(&err)));
                Err(err)
            }
        }
    }

    /// Forgets the signed-in user.
    pub async fn logout(&self) {
        if self.user.write().await.take().is_some() {
            tracing::info!("signed out");
        }
    }
}

/// Server-supplied reason, or [`INVALID_CREDENTIALS`].
fn login_failure_message(err: &SyncError) -> String {
    match err {
        SyncError::Logical(message) if message != GENERIC_FAILURE => message.clone(),
        SyncError::Transport {
            message,
            status: Some(_),
        } => message.clone(),
        _ => INVALID_CREDENTIALS.to_string(),
    }
}
