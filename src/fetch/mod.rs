//! Fetcher boundary: the injected HTTP capability the controllers use.
//!
//! [`Fetcher`] returns raw JSON bodies; [`envelope`] normalizes them into
//! success/failure and rows/total according to the resource configuration.
//! [`HttpFetcher`] is the production implementation built on `reqwest`.

pub mod envelope;
pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SyncError;
use crate::query::RequestParams;

pub use http::HttpFetcher;

/// HTTP method of a write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl WriteMethod {
    /// Method name as used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Remote API access used by every controller.
///
/// Implementations attach credentials and map transport problems to
/// [`SyncError::Transport`]. They do not interpret the `status` flag of the
/// payload; that happens in [`envelope`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// `GET path?params`, returning the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] if the request fails or the server
    /// answers with a non-2xx status.
    async fn get(&self, path: &str, params: &RequestParams) -> Result<Value, SyncError>;

    /// Sends a write request with an optional JSON body, returning the JSON
    /// body of the response.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] if the request fails or the server
    /// answers with a non-2xx status.
    async fn send(
        &self,
        method: WriteMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, SyncError>;
}
