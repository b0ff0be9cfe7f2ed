//! Client configuration.
//!
//! `ClientConfig` is set once when a client is built and never changes
//! afterwards. It deserializes from the caller's own config files:
//!
//! ```toml
//! base_url = "http://127.0.0.1:9180/apisix/admin"
//! api_key = "edd1c9f034335f136f87ad84b625c8f1"
//! timeout_secs = 10
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sub-second precision is dropped; zero disables the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Base URL with trailing slashes removed.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Checks that the base URL is an absolute http(s) URL without a query
    /// string or fragment.
    pub fn validate(&self) -> Result<(), ApiError> {
        let base = self.normalized_base_url();
        let parsed = url::Url::parse(base)
            .map_err(|e| ApiError::InvalidConfig(format!("base URL `{base}`: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidConfig(format!(
                "base URL `{base}` must use http or https"
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ApiError::InvalidConfig(format!(
                "base URL `{base}` must not carry a query or fragment"
            )));
        }
        if let Some(key) = &self.api_key {
            if key.chars().any(|c| c.is_control()) {
                return Err(ApiError::InvalidConfig(
                    "API key contains control characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(redact))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Redacted key for logs (head4…tail4).
fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0..=8 => "***".to_string(),
        n => {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{head}…{tail}")
        }
    }
}
