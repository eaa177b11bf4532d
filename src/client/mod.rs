//! Dropzone API client.
//!
//! Provides the main client interface for interacting with the Dropzone
//! file-storage API.

use std::sync::Arc;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{DropzoneConfig, DropzoneConfigBuilder};
use crate::errors::{DropzoneError, DropzoneResult};
use crate::services::FilesService;
use crate::transport::{HttpTransport, HttpTransportImpl, RequestExecutor};
use crate::types::{StoredFile, UploadFile};

/// The main Dropzone client.
///
/// Holds only read-only configuration and a shared HTTP connection pool,
/// so one instance can serve concurrent calls.
///
/// # Example
///
/// ```rust,no_run
/// use dropzone_client::{DropzoneClient, UploadFile};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DropzoneClient::new("https://files.example.com", "dz_key", "tenant42")?;
///
///     let stored = client
///         .upload_files("photos", &[UploadFile::new("cat.png", std::fs::read("cat.png")?)])
///         .await?;
///
///     for file in client.get_files("photos").await? {
///         println!("{} ({} MB)", file.name, file.size_in_mb);
///     }
///
///     client.delete_file(&stored[0].src, Some(stored[0].preview.as_str())).await?;
///     Ok(())
/// }
/// ```
pub struct DropzoneClient {
    config: DropzoneConfig,
    executor: Arc<RequestExecutor>,
    files_service: FilesService,
}

impl DropzoneClient {
    /// Creates a client from a base URL, API key and base path.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        base_path: impl Into<String>,
    ) -> DropzoneResult<Self> {
        DropzoneClientBuilder::new()
            .base_url(base_url)
            .api_key(api_key)
            .base_path(base_path)
            .build()
    }

    /// Creates a new client builder.
    pub fn builder() -> DropzoneClientBuilder {
        DropzoneClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`DropzoneConfig::from_env`] for the variables read.
    pub fn from_env() -> DropzoneResult<Self> {
        let config = DropzoneConfig::from_env()?;
        DropzoneClientBuilder::from_config(config).build()
    }

    /// Uploads `files` under `path`, relative to the base path.
    pub async fn upload_files(
        &self,
        path: &str,
        files: &[UploadFile],
    ) -> DropzoneResult<Vec<StoredFile>> {
        self.files_service.upload_files(path, files).await
    }

    /// Lists the files stored under `path`, relative to the base path.
    pub async fn get_files(&self, path: &str) -> DropzoneResult<Vec<StoredFile>> {
        self.files_service.get_files(path).await
    }

    /// Deletes the file at `src`, along with its preview when given.
    pub async fn delete_file(&self, src: &str, preview: Option<&str>) -> DropzoneResult<()> {
        self.files_service.delete_file(src, preview).await
    }

    /// Returns the files service.
    pub fn files(&self) -> &FilesService {
        &self.files_service
    }

    /// Returns the request executor, for endpoints without a dedicated
    /// service method.
    pub fn requests(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DropzoneConfig {
        &self.config
    }
}

impl std::fmt::Debug for DropzoneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropzoneClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Dropzone client.
pub struct DropzoneClientBuilder {
    config_builder: DropzoneConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl DropzoneClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: DropzoneConfigBuilder::new(),
            transport: None,
            auth: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: DropzoneConfig) -> Self {
        let mut config_builder = DropzoneConfigBuilder::new()
            .api_key(config.api_key())
            .base_url(&config.base_url)
            .base_path(&config.base_path);

        if let Some(timeout) = config.timeout {
            config_builder = config_builder.timeout(timeout);
        }
        for (name, value) in &config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            transport: None,
            auth: None,
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_path(base_path);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> DropzoneResult<DropzoneClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout).map_err(|e| {
                    DropzoneError::Configuration {
                        message: e.to_string(),
                    }
                })?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        let executor = Arc::new(RequestExecutor::new(
            transport,
            auth,
            config.custom_headers.clone(),
        ));

        let files_service = FilesService::new(Arc::clone(&executor), config.base_path.clone());

        tracing::debug!(
            base_url = %config.base_url,
            base_path = %config.base_path,
            key_hint = %config.api_key_hint(),
            "Dropzone client created"
        );

        Ok(DropzoneClient {
            config,
            executor,
            files_service,
        })
    }
}

impl Default for DropzoneClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{fixtures, MockAuth, MockTransport};

    fn mock_client(transport: Arc<MockTransport>) -> DropzoneClient {
        DropzoneClient::builder()
            .base_url("https://files.example.com")
            .api_key("dz_test_key")
            .base_path("tenant42")
            .transport(transport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = DropzoneClientBuilder::new()
            .base_url("https://files.example.com")
            .base_path("tenant42")
            .build();
        assert!(matches!(result, Err(DropzoneError::Configuration { .. })));
    }

    #[test]
    fn test_new_builds_client() {
        let client = DropzoneClient::new("https://files.example.com/", "dz_test_key", "tenant42")
            .unwrap();

        assert_eq!(client.config().base_url, "https://files.example.com");
        assert_eq!(client.files().base_path(), "tenant42");
    }

    #[test]
    fn test_from_config_round_trips_settings() {
        let config = DropzoneConfig::builder()
            .base_url("https://files.example.com")
            .api_key("dz_test_key")
            .base_path("tenant42")
            .timeout_secs(10)
            .header("X-Client", "tests")
            .build()
            .unwrap();

        let client = DropzoneClientBuilder::from_config(config).build().unwrap();

        assert_eq!(client.config().timeout, Some(std::time::Duration::from_secs(10)));
        assert_eq!(client.config().custom_headers.len(), 1);
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = DropzoneClient::new("https://files.example.com", "dz_secret_key", "t").unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("dz_secret_key"));
    }

    #[tokio::test]
    async fn test_client_delegates_to_files_service() {
        let transport = Arc::new(MockTransport::new());
        let stored = vec![fixtures::stored_file("tenant42/photos", "cat.png")];
        transport.queue_json(&fixtures::envelope(&stored));

        let client = mock_client(transport.clone());
        let result = client.get_files("photos").await.unwrap();

        assert_eq!(result, stored);
        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/files/with-path?path=tenant42/photos");
        assert_eq!(request.headers.get("x-api-key"), Some(&"dz_test_key".to_string()));
    }

    #[tokio::test]
    async fn test_custom_auth_and_headers_apply() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&serde_json::json!({"data": null}));

        let client = DropzoneClient::builder()
            .base_url("https://files.example.com")
            .api_key("dz_test_key")
            .base_path("tenant42")
            .header("X-Client", "tests")
            .transport(transport.clone())
            .auth(Arc::new(MockAuth::new("override-key")))
            .build()
            .unwrap();

        client.delete_file("a.png", None).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.headers.get("x-api-key"), Some(&"override-key".to_string()));
        assert_eq!(request.headers.get("x-client"), Some(&"tests".to_string()));
    }
}
