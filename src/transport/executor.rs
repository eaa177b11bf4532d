//! Request execution and response normalization.
//!
//! Every API call goes through [`RequestExecutor`]: it assembles headers,
//! encodes the body, sends exactly one request, parses the response body
//! once and maps non-2xx statuses to [`DropzoneError::Api`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest};
use crate::auth::AuthProvider;
use crate::errors::{DropzoneError, DropzoneResult};
use crate::observability::redact_headers;

const CONTENT_TYPE: &str = "content-type";

/// Issues requests and normalizes their outcome.
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    default_headers: Vec<(String, String)>,
}

impl RequestExecutor {
    /// Creates a new executor.
    ///
    /// `default_headers` are sent with every request at the lowest
    /// precedence.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        default_headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            transport,
            auth,
            default_headers,
        }
    }

    /// Sends a GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        headers: Option<HashMap<String, String>>,
    ) -> DropzoneResult<T> {
        self.execute(with_headers(HttpRequest::get(endpoint), headers))
            .await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        headers: Option<HashMap<String, String>>,
    ) -> DropzoneResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(HttpRequest::post(endpoint), body, headers)
            .await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        headers: Option<HashMap<String, String>>,
    ) -> DropzoneResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(HttpRequest::put(endpoint), body, headers)
            .await
    }

    /// Sends a PATCH request with a JSON body.
    pub async fn patch<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        headers: Option<HashMap<String, String>>,
    ) -> DropzoneResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(HttpRequest::patch(endpoint), body, headers)
            .await
    }

    /// Sends a DELETE request.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        headers: Option<HashMap<String, String>>,
    ) -> DropzoneResult<T> {
        self.execute(with_headers(HttpRequest::delete(endpoint), headers))
            .await
    }

    /// Sends a multipart POST request.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        parts: Vec<MultipartPart>,
        headers: Option<HashMap<String, String>>,
    ) -> DropzoneResult<T> {
        let mut request = MultipartRequest::new(endpoint);
        request.parts = parts;
        request.headers = normalize_headers(headers);
        self.execute_multipart(request).await
    }

    async fn execute_json<B, T>(
        &self,
        request: HttpRequest,
        body: &B,
        headers: Option<HashMap<String, String>>,
    ) -> DropzoneResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(|e| DropzoneError::Serialization {
            message: e.to_string(),
        })?;
        self.execute(with_headers(request, headers).with_body(body))
            .await
    }

    /// Executes a prepared request.
    pub async fn execute<T: DeserializeOwned>(&self, mut request: HttpRequest) -> DropzoneResult<T> {
        let caller_headers = std::mem::take(&mut request.headers);
        request.headers = self.assemble_headers(caller_headers, request.method.has_json_body());

        let method = request.method;
        let endpoint = request.path.clone();

        debug!(
            method = %method,
            path = %endpoint,
            headers = ?redact_headers(&request.headers),
            "Sending request"
        );

        let start = Instant::now();
        let response = self.transport.send(request).await?;

        debug!(
            status = response.status,
            elapsed_ms = elapsed_ms(start),
            "Received response"
        );

        handle_response(method, &endpoint, &response)
    }

    /// Executes a prepared multipart request.
    pub async fn execute_multipart<T: DeserializeOwned>(
        &self,
        mut request: MultipartRequest,
    ) -> DropzoneResult<T> {
        let caller_headers = std::mem::take(&mut request.headers);
        request.headers = self.assemble_headers(caller_headers, false);

        let endpoint = request.path.clone();

        debug!(
            method = %HttpMethod::Post,
            path = %endpoint,
            parts = request.parts.len(),
            headers = ?redact_headers(&request.headers),
            "Sending multipart request"
        );

        let start = Instant::now();
        let response = self.transport.send_multipart(request).await?;

        debug!(
            status = response.status,
            elapsed_ms = elapsed_ms(start),
            "Received response"
        );

        handle_response(HttpMethod::Post, &endpoint, &response)
    }

    /// Merges headers, lowest precedence first: defaults, caller, auth,
    /// JSON content type.
    fn assemble_headers(
        &self,
        caller: HashMap<String, String>,
        json_body: bool,
    ) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        for (name, value) in self.default_headers.iter().cloned().chain(caller) {
            headers.insert(name.to_ascii_lowercase(), value);
        }

        self.auth.apply_auth(&mut headers);

        if json_body {
            headers.insert(
                CONTENT_TYPE.to_string(),
                mime::APPLICATION_JSON.to_string(),
            );
        }

        headers
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("default_headers", &self.default_headers.len())
            .finish()
    }
}

fn with_headers(mut request: HttpRequest, headers: Option<HashMap<String, String>>) -> HttpRequest {
    request.headers.extend(normalize_headers(headers));
    request
}

/// Lowercases caller header names. Names equal up to case are applied in
/// sorted order of their original spelling, last one wins.
fn normalize_headers(headers: Option<HashMap<String, String>>) -> HashMap<String, String> {
    let mut headers: Vec<(String, String)> = headers.unwrap_or_default().into_iter().collect();
    headers.sort();
    headers
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect()
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Parses the body once and turns the response into a result.
fn handle_response<T: DeserializeOwned>(
    method: HttpMethod,
    endpoint: &str,
    response: &HttpResponse,
) -> DropzoneResult<T> {
    let parsed = parse_body(&response.body);

    if !response.is_success() {
        let data = parsed.unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&response.body).into_owned())
        });
        warn!(
            method = %method,
            path = %endpoint,
            status = response.status,
            "Request failed"
        );
        return Err(DropzoneError::api(method, endpoint, response.status, data));
    }

    let value = parsed.map_err(|e| DropzoneError::InvalidBody {
        status: response.status,
        message: e.to_string(),
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })?;

    serde_json::from_value(value).map_err(|e| DropzoneError::Deserialization {
        message: e.to_string(),
    })
}

/// An empty body parses as JSON `null`.
fn parse_body(body: &[u8]) -> Result<serde_json::Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(body)
}
