//! Error types for the Dropzone client.
//!
//! Every operation funnels its failures into [`DropzoneError`]. The
//! [`DropzoneError::Api`] variant is the structured failure raised whenever
//! the server answers with a status outside the 2xx range; it carries the
//! parsed response body for diagnostics.

use std::time::Duration;
use thiserror::Error;

use crate::transport::{HttpMethod, TransportError};

/// Result type alias for Dropzone operations.
pub type DropzoneResult<T> = Result<T, DropzoneError>;

/// Error type for Dropzone client operations.
#[derive(Debug, Error)]
pub enum DropzoneError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api {
        /// Message embedding the verb, endpoint and status.
        message: String,
        /// HTTP method of the failing request.
        method: HttpMethod,
        /// HTTP status code.
        status: u16,
        /// Parsed response body of the failing call.
        data: serde_json::Value,
    },

    /// A successful response whose body is not valid JSON.
    #[error("Invalid response body (HTTP {status}): {message}")]
    InvalidBody {
        /// HTTP status code.
        status: u16,
        /// Parser error message.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The response body parsed as JSON but did not have the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Error message.
        message: String,
    },

    /// The request body could not be encoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Request timeout after {timeout:?}")]
    Timeout {
        /// Configured timeout that elapsed.
        timeout: Duration,
    },

    /// Configuration error (missing API key, invalid base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },
}

impl DropzoneError {
    /// Builds the structured failure for a non-2xx response.
    pub fn api(
        method: HttpMethod,
        endpoint: &str,
        status: u16,
        data: serde_json::Value,
    ) -> Self {
        let reason = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason());

        let message = match reason {
            Some(text) => format!(
                "{} {} failed with status {} {}",
                method.as_str(),
                endpoint,
                status,
                text
            ),
            None => format!(
                "{} {} failed with status {}",
                method.as_str(),
                endpoint,
                status
            ),
        };

        DropzoneError::Api {
            message,
            method,
            status,
            data,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        DropzoneError::Configuration {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            DropzoneError::Api { status, .. } | DropzoneError::InvalidBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Returns the parsed body attached to an API failure.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            DropzoneError::Api { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Returns true if the server rejected the request.
    pub fn is_api_error(&self) -> bool {
        matches!(self, DropzoneError::Api { .. })
    }
}

impl From<TransportError> for DropzoneError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { timeout } => DropzoneError::Timeout { timeout },
            TransportError::InvalidRequest { message } => DropzoneError::Serialization { message },
            other => DropzoneError::Network {
                message: other.to_string(),
            },
        }
    }
}

impl From<url::ParseError> for DropzoneError {
    fn from(err: url::ParseError) -> Self {
        DropzoneError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
