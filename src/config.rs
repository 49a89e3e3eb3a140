//! API client configuration

use std::time::Duration;

/// Default development origin, path-prefixed like the deployed API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Upper bound on any single request. Bulk market refreshes are slow on the
/// server side, so this is deliberately generous.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for [`crate::api::ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base origin including the `/api` prefix, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
