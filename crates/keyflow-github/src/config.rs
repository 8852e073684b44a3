//! GitHub client configuration

use crate::error::{GitHubError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`GitHubClient`](crate::GitHubClient)
#[derive(Clone)]
pub struct GitHubConfig {
    pub token: String,
    /// API root, overridable for GitHub Enterprise
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl GitHubConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("keyflow/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create GitHubConfig from environment variables
    ///
    /// - `GITHUB_TOKEN` (required)
    /// - `GITHUB_BASE_URL` (default: `https://api.github.com`)
    /// - `KEYFLOW_HTTP_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GitHubError::MissingEnvVar("GITHUB_TOKEN".to_string()))?;

        let mut config = Self::new(token);

        if let Ok(base_url) = std::env::var("GITHUB_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        if let Ok(secs) = std::env::var("KEYFLOW_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                GitHubError::InvalidConfig(format!(
                    "KEYFLOW_HTTP_TIMEOUT_SECS must be a number of seconds, got {:?}",
                    secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}
