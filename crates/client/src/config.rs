//! Client configuration
//!
//! Loads transport settings from environment variables with sensible
//! development defaults.
//!
//! ## Environment Variables
//! - `FOLIO_API_BASE_URL`: backend origin including the API prefix,
//!   e.g. `https://api.example.com/api`
//! - `FOLIO_API_TIMEOUT_MS`: transport-level request timeout in
//!   milliseconds

use std::time::Duration;

use folio_domain::FolioError;

/// Default backend origin for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default transport timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Transport configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all requests, without a trailing slash
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}

impl ClientConfig {
    /// Build a config for the given base URL with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: normalize_base_url(base_url.into()), ..Self::default() }
    }

    /// Load configuration from environment variables, falling back to
    /// defaults for unset values.
    ///
    /// # Errors
    /// Returns `FolioError::Config` when a variable is set but invalid.
    pub fn from_env() -> Result<Self, FolioError> {
        let base_url = std::env::var("FOLIO_API_BASE_URL")
            .map(normalize_base_url)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = match std::env::var("FOLIO_API_TIMEOUT_MS") {
            Ok(raw) => {
                let millis = raw.parse::<u64>().map_err(|e| {
                    FolioError::Config(format!("Invalid FOLIO_API_TIMEOUT_MS: {e}"))
                })?;
                if millis == 0 {
                    return Err(FolioError::Config(
                        "FOLIO_API_TIMEOUT_MS must be greater than 0".to_string(),
                    ));
                }
                Duration::from_millis(millis)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        tracing::debug!(%base_url, ?timeout, "client configuration loaded");
        Ok(Self { base_url, timeout })
    }

    /// Override the timeout (builder style)
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ClientConfig::new("https://api.example.com/api/");
        assert_eq!(config.base_url, "https://api.example.com/api");
    }

    #[test]
    fn with_timeout_overrides_default() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(2));
    }
}
