//! `reqwest`-backed [`Fetcher`].
//!
//! One `HttpFetcher` is shared by all controllers. Its client keeps a cookie
//! store, so the session cookie set by the login endpoint is sent on every
//! later request.

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;

use super::envelope::server_message;
use super::{Fetcher, WriteMethod};
use crate::config::{ClientConfig, validate_base_url};
use crate::error::SyncError;
use crate::query::RequestParams;

/// HTTP implementation of [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpFetcher {
    /// Builds a fetcher from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the base URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, SyncError> {
        let base_url = validate_base_url(&config.api_base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .cookie_store(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `path` to the base URL, keeping any path prefix of the base.
    fn url_for(&self, path: &str) -> Result<Url, SyncError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| SyncError::Config(format!("endpoint `{path}`: {e}")))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, SyncError> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_body(status, &text)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, path: &str, params: &RequestParams) -> Result<Value, SyncError> {
        let mut url = self.url_for(path)?;
        params.apply_to(&mut url);
        tracing::debug!(method = "GET", %url, "sending request");
        self.execute(self.client.get(url)).await
    }

    async fn send(
        &self,
        method: WriteMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, SyncError> {
        let url = self.url_for(path)?;
        tracing::debug!(method = method.as_str(), %url, "sending request");
        let http_method = match method {
            WriteMethod::Post => Method::POST,
            WriteMethod::Put => Method::PUT,
            WriteMethod::Patch => Method::PATCH,
            WriteMethod::Delete => Method::DELETE,
        };
        let mut request = self.client.request(http_method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.execute(request).await
    }
}

/// Turns a status code and body text into the JSON body or a transport
/// error. Non-2xx responses prefer the server's `message` field.
fn decode_body(status: StatusCode, text: &str) -> Result<Value, SyncError> {
    let parsed = serde_json::from_str::<Value>(text);

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .ok()
            .and_then(server_message)
            .unwrap_or_else(|| match status.canonical_reason() {
                Some(reason) => format!("HTTP {}: {reason}", status.as_u16()),
                None => format!("HTTP {}", status.as_u16()),
            });
        tracing::warn!(status = status.as_u16(), %message, "request failed");
        return Err(SyncError::Transport {
            message,
            status: Some(status.as_u16()),
        });
    }

    parsed.map_err(|e| SyncError::MalformedResponse(format!("response is not JSON: {e}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_is_returned() {
        let Ok(body) = decode_body(StatusCode::OK, r#"{"status":true,"data":[]}"#) else {
            panic!("expected body");
        };
        assert_eq!(body, json!({"status": true, "data": []}));
    }

    #[test]
    fn error_status_prefers_server_message() {
        let result = decode_body(
            StatusCode::CONFLICT,
            r#"{"status":false,"message":"Campaign locked"}"#,
        );
        assert_eq!(
            result,
            Err(SyncError::Transport {
                message: "Campaign locked".into(),
                status: Some(409),
            })
        );
    }

    #[test]
    fn error_status_without_body_uses_reason() {
        let Err(err) = decode_body(StatusCode::BAD_GATEWAY, "<html>") else {
            panic!("expected failure");
        };
        assert_eq!(err.user_message(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn non_json_success_is_malformed() {
        let result = decode_body(StatusCode::OK, "ok");
        assert!(matches!(result, Err(SyncError::MalformedResponse(_))));
    }

    #[test]
    fn url_for_keeps_base_prefix() {
        let Ok(fetcher) = HttpFetcher::new(&ClientConfig::new("http://localhost:9000/api/")) else {
            panic!("fetcher should build");
        };
        let Ok(url) = fetcher.url_for("/admin/plan/getAll") else {
            panic!("url should resolve");
        };
        assert_eq!(url.as_str(), "http://localhost:9000/api/admin/plan/getAll");
    }
}
