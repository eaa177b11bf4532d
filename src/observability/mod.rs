//! Observability module for the Dropzone client.
//!
//! The client emits `tracing` events and spans; this module offers a
//! subscriber setup for applications that do not bring their own, and the
//! header redaction applied before anything is logged.

mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};

use std::collections::HashMap;

const SENSITIVE_HEADERS: [&str; 3] = ["x-api-key", "authorization", "cookie"];

/// Returns a copy of `headers` with secret values masked.
pub fn redact_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let sensitive = SENSITIVE_HEADERS
                .iter()
                .any(|s| name.eq_ignore_ascii_case(s));
            let value = if sensitive {
                "***".to_string()
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}
