//! Configuration module for the Dropzone client.
//!
//! A configuration is fixed for the lifetime of a client: base URL, API
//! key and the base path every caller-supplied path is prefixed with.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{DropzoneError, DropzoneResult};

/// Environment variable holding the base URL.
pub const ENV_BASE_URL: &str = "DROPZONE_BASE_URL";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "DROPZONE_API_KEY";

/// Environment variable holding the base path.
pub const ENV_BASE_PATH: &str = "DROPZONE_BASE_PATH";

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "DROPZONE_TIMEOUT";

/// Configuration for the Dropzone client.
#[derive(Clone)]
pub struct DropzoneConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests, without trailing slash.
    pub base_url: String,
    /// Prefix applied to every caller-supplied path.
    pub base_path: String,
    /// Request timeout; requests wait indefinitely when unset.
    pub timeout: Option<Duration>,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl DropzoneConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> DropzoneConfigBuilder {
        DropzoneConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DROPZONE_BASE_URL` (required): API base URL
    /// - `DROPZONE_API_KEY` (required): API key for authentication
    /// - `DROPZONE_BASE_PATH` (required): prefix for stored paths
    /// - `DROPZONE_TIMEOUT` (optional): request timeout in seconds
    pub fn from_env() -> DropzoneResult<Self> {
        let mut builder = DropzoneConfigBuilder::new()
            .base_url(required_env(ENV_BASE_URL)?)
            .api_key(required_env(ENV_API_KEY)?)
            .base_path(required_env(ENV_BASE_PATH)?);

        if let Ok(timeout_str) = std::env::var(ENV_TIMEOUT) {
            let secs = timeout_str.parse::<u64>().map_err(|_| {
                DropzoneError::configuration(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT, timeout_str
                ))
            })?;
            builder = builder.timeout_secs(secs);
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        crate::auth::key_hint(self.api_key.expose_secret())
    }
}

impl std::fmt::Debug for DropzoneConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropzoneConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("base_path", &self.base_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required_env(name: &str) -> DropzoneResult<String> {
    std::env::var(name).map_err(|_| {
        DropzoneError::configuration(format!("{} environment variable not set", name))
    })
}

/// Builder for `DropzoneConfig`.
#[derive(Default)]
pub struct DropzoneConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    base_path: Option<String>,
    timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl DropzoneConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> DropzoneResult<DropzoneConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| DropzoneError::configuration("API key is required"))?;

        if api_key.trim().is_empty() {
            return Err(DropzoneError::configuration("API key cannot be empty"));
        }

        let base_url = self
            .base_url
            .ok_or_else(|| DropzoneError::configuration("Base URL is required"))?
            .trim_end_matches('/')
            .to_string();

        let parsed = url::Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DropzoneError::configuration(format!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.scheme() == "http" {
            tracing::warn!(base_url = %base_url, "Base URL is not using HTTPS; API key is sent in clear text");
        }

        let base_path = self
            .base_path
            .ok_or_else(|| DropzoneError::configuration("Base path is required"))?;

        Ok(DropzoneConfig {
            api_key: SecretString::new(api_key),
            base_url,
            base_path,
            timeout: self.timeout,
            custom_headers: self.custom_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> DropzoneConfigBuilder {
        DropzoneConfig::builder()
            .api_key("dz_test_api_key_12345")
            .base_url("https://files.example.com/")
            .base_path("tenant42")
    }

    #[test]
    fn test_config_builder_success() {
        let config = builder()
            .timeout(Duration::from_secs(30))
            .header("X-Client", "tests")
            .build()
            .unwrap();

        assert_eq!(config.api_key(), "dz_test_api_key_12345");
        assert_eq!(config.base_url, "https://files.example.com");
        assert_eq!(config.base_path, "tenant42");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            config.custom_headers,
            vec![("X-Client".to_string(), "tests".to_string())]
        );
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.timeout, None);
        assert!(config.custom_headers.is_empty());
    }

    #[test]
    fn test_config_builder_missing_fields() {
        assert!(DropzoneConfig::builder()
            .base_url("https://files.example.com")
            .base_path("p")
            .build()
            .is_err());
        assert!(DropzoneConfig::builder()
            .api_key("k")
            .base_path("p")
            .build()
            .is_err());
        assert!(DropzoneConfig::builder()
            .api_key("k")
            .base_url("https://files.example.com")
            .build()
            .is_err());
    }

    #[test]
    fn test_config_builder_empty_api_key() {
        let result = builder().api_key("").build();
        assert!(matches!(result, Err(DropzoneError::Configuration { .. })));
    }

    #[test]
    fn test_config_builder_invalid_base_url() {
        assert!(builder().base_url("not a url").build().is_err());
        assert!(builder().base_url("ftp://files.example.com").build().is_err());
        assert!(builder().base_url("http://localhost:8080").build().is_ok());
    }

    #[test]
    fn test_api_key_hint() {
        let config = builder().build().unwrap();

        let hint = config.api_key_hint();
        assert_eq!(hint, "...2345");
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = builder().build().unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("dz_test_api_key_12345"));
    }
}
