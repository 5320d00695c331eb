//! Process-wide API configuration.
//!
//! The base URL is read once and injected into the gateway. It is validated
//! on every call rather than at construction, so a misconfigured build still
//! starts and reports the problem on its first request.

use std::env;

use url::Url;

use crate::error::ApiError;

/// Environment variable holding the backend's absolute base URL.
pub const API_URL_ENV: &str = "JOBBOARD_API_URL";

/// What an unset variable becomes after naive string substitution.
const UNDEFINED_SENTINEL: &str = "undefined";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: Some(base_url.trim_end_matches('/').to_string()),
        }
    }

    /// A configuration with no base URL. Every call through it fails.
    pub fn unset() -> Self {
        Self { base_url: None }
    }

    /// Read `JOBBOARD_API_URL`. Binaries load `.env` before calling this.
    pub fn from_env() -> Self {
        match env::var(API_URL_ENV) {
            Ok(url) => Self::new(url),
            Err(_) => Self::unset(),
        }
    }

    /// The validated base URL, without a trailing slash.
    pub fn base_url(&self) -> Result<&str, ApiError> {
        let url = match self.base_url.as_deref() {
            None => return Err(ApiError::Config(format!("{API_URL_ENV} is not set"))),
            Some(url) => url,
        };
        if url.trim().is_empty() {
            return Err(ApiError::Config(format!("{API_URL_ENV} is empty")));
        }
        if url == UNDEFINED_SENTINEL {
            return Err(ApiError::Config(format!(
                "{API_URL_ENV} is the literal string \"undefined\""
            )));
        }
        let parsed = Url::parse(url)
            .map_err(|e| ApiError::Config(format!("{API_URL_ENV} is not an absolute URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(ApiError::Config(format!(
                "{API_URL_ENV} must be an http(s) URL, got {url}"
            )));
        }
        Ok(url)
    }
}
