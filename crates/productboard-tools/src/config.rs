//! Process-wide Productboard API settings.
//!
//! An [`ApiConfig`] is built once at startup and handed to the tool source; it is never mutated
//! afterwards.

use crate::runtime::{ProductboardToolsError, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.productboard.com";
/// Value of the `X-Version` header sent with every request.
pub const DEFAULT_API_VERSION: &str = "1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer credential. Redacted from `Debug` output.
    pub token: String,
    pub api_version: String,
    /// Per-request timeout covering connect, send and body read.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Defaults for everything except the credential.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the settings and return the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns a config error if the base URL is invalid, the token or API version is blank, or
    /// the timeout is zero.
    pub fn validate(&self) -> Result<Url> {
        let url = crate::safety::validate_base_url(&self.base_url)?;

        if self.token.trim().is_empty() {
            return Err(ProductboardToolsError::Config(
                "Productboard API token must not be empty".to_string(),
            ));
        }
        if self.api_version.trim().is_empty() {
            return Err(ProductboardToolsError::Config(
                "Productboard API version must not be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ProductboardToolsError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(url)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}
