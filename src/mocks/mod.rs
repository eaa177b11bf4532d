//! Mock implementations for testing.
//!
//! Provides a mock transport and auth provider for unit testing without
//! making real API calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::auth::{AuthProvider, API_KEY_HEADER};
use crate::errors::DropzoneError;
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest,
    TransportError,
};

/// Mock HTTP transport for testing.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<MockResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path, including the query string.
    pub path: String,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Multipart parts, for multipart requests.
    pub parts: Option<Vec<MultipartPart>>,
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        Self {
            status: 200,
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Creates a response with a raw text body.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    /// Creates an API error response in the envelope shape.
    pub fn error(status: u16, message: &str) -> Self {
        let error = serde_json::json!({
            "data": null,
            "meta": {
                "message": message,
                "status": status,
                "ok": false
            }
        });

        Self::json(&error).with_status(status)
    }

    /// Creates a response with custom status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.responses).push_back(Ok(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Queues a transport-level failure.
    pub fn queue_failure(&self, error: TransportError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Sets the default response.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_response(&self) -> Result<HttpResponse, TransportError> {
        let next = lock(&self.responses).pop_front();
        let response = match next {
            Some(result) => result?,
            None => lock(&self.default_response)
                .clone()
                .unwrap_or_else(|| MockResponse::error(500, "No mock response configured")),
        };

        Ok(HttpResponse {
            status: response.status,
            body: response.body,
        })
    }

    fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: request.method,
            path: request.path,
            body: request.body,
            headers: request.headers,
            parts: None,
        });

        self.next_response()
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: HttpMethod::Post,
            path: request.path,
            body: None,
            headers: request.headers,
            parts: Some(request.parts),
        });

        self.next_response()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Mock auth provider for testing.
pub struct MockAuth {
    api_key: String,
}

impl MockAuth {
    /// Creates a new mock auth provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new("dz_mock_test_key")
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(API_KEY_HEADER.to_string(), self.api_key.clone());
    }

    fn validate(&self) -> Result<(), DropzoneError> {
        Ok(())
    }
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth").finish()
    }
}

/// Test fixtures for common response types.
pub mod fixtures {
    use crate::types::{Envelope, Meta, StoredFile};

    /// Creates stored-file metadata for `name` under `dir`.
    pub fn stored_file(dir: &str, name: &str) -> StoredFile {
        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        StoredFile {
            name: name.to_string(),
            src: format!("{}/{}", dir, name),
            file_type: "application/octet-stream".to_string(),
            name_without_extension: stem.to_string(),
            size_in_mb: 0.5,
            preview: format!("{}/{}-preview.png", dir, stem),
        }
    }

    /// Wraps `data` in a successful envelope.
    pub fn envelope<T: Clone>(data: &T) -> Envelope<T> {
        Envelope {
            data: Some(data.clone()),
            meta: Meta {
                message: "OK".to_string(),
                status: 200,
                ok: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_queue() {
        let transport = MockTransport::new();
        transport.queue_json(&serde_json::json!({"test": "value"}));

        let response = transport.send(HttpRequest::get("test")).await.unwrap();

        assert_eq!(response.status, 200);
        assert!(String::from_utf8_lossy(&response.body).contains("value"));
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        transport.set_default(MockResponse::json(&serde_json::json!({})));

        transport.send(HttpRequest::get("path1")).await.unwrap();
        transport.send(HttpRequest::delete("path2")).await.unwrap();
        transport
            .send_multipart(MultipartRequest::new("path3"))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].path, "path1");
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert_eq!(requests[2].method, HttpMethod::Post);
        assert_eq!(requests[2].parts.as_ref().map(Vec::len), Some(0));

        transport.clear_requests();
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_transport_error_response() {
        let transport = MockTransport::new();
        transport.queue_error(404, "File not found");

        let response = transport.send(HttpRequest::get("test")).await.unwrap();

        assert_eq!(response.status, 404);
        assert!(String::from_utf8_lossy(&response.body).contains("File not found"));
    }

    #[tokio::test]
    async fn test_mock_transport_without_response_returns_500() {
        let transport = MockTransport::new();
        let response = transport.send(HttpRequest::get("test")).await.unwrap();
        assert_eq!(response.status, 500);
    }
}
