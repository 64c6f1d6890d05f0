//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The resulting [`ClientConfig`] is passed
//! explicitly to the fetcher and controllers; nothing is process-global.

use std::time::Duration;

use crate::domain::pagination::DEFAULT_PAGE_SIZE;
use crate::error::SyncError;

/// Default backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://advertiserappnew.onrender.com";

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_base_url: String,

    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,

    /// Page size used when a list is first opened.
    pub default_page_size: u32,

    /// Bearer token sent as `Authorization`, in addition to any session
    /// cookie the client picked up at login.
    pub bearer_token: Option<String>,

    /// Capacity of the notification broadcast channel.
    pub notification_capacity: usize,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout: Duration::from_secs(30),
            default_page_size: DEFAULT_PAGE_SIZE,
            bearer_token: None,
            notification_capacity: 256,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if `API_BASE_URL` is not an absolute
    /// http(s) URL.
    pub fn from_env() -> Result<Self, SyncError> {
        dotenvy::dotenv().ok();

        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        validate_base_url(&api_base_url)?;

        let request_timeout = Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECS", 30));
        let default_page_size = match parse_env("DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE) {
            0 => DEFAULT_PAGE_SIZE,
            n => n,
        };
        let bearer_token = std::env::var("API_BEARER_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let notification_capacity = parse_env("NOTIFICATION_CAPACITY", 256_usize).max(1);

        Ok(Self {
            api_base_url,
            request_timeout,
            default_page_size,
            bearer_token,
            notification_capacity,
        })
    }
}

/// Checks that `url` parses and uses http or https.
///
/// # Errors
///
/// Returns [`SyncError::Config`] otherwise.
pub fn validate_base_url(url: &str) -> Result<reqwest::Url, SyncError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| SyncError::Config(format!("API_BASE_URL `{url}`: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SyncError::Config(format!(
            "API_BASE_URL must be http or https, got `{other}`"
        ))),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let cfg = ClientConfig::new("http://localhost:8080");
        assert_eq!(cfg.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert!(cfg.bearer_token.is_none());
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(validate_base_url("https://advertiserappnew.onrender.com").is_ok());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u64 = parse_env("ADBOARD_SYNC_TEST_SURELY_UNSET", 7);
        assert_eq!(value, 7);
    }
}
