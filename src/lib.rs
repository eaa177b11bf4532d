//! Dropzone Client Library
//!
//! An async Rust client for the Dropzone file-storage REST API. Upload a
//! batch of files under a logical path, list the files stored under a
//! path, and delete a file by its source reference.
//!
//! # Features
//!
//! - **Uniform error contract**: every non-2xx response becomes a
//!   [`DropzoneError::Api`] carrying the parsed response body
//! - **Multipart uploads**: any number of files in a single request
//! - **Observability**: `tracing` spans and events with secrets redacted
//! - **Testability**: pluggable [`transport::HttpTransport`] and
//!   [`auth::AuthProvider`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dropzone_client::{DropzoneClient, UploadFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DropzoneClient::builder()
//!         .base_url("https://files.example.com")
//!         .api_key("dz_your_api_key")
//!         .base_path("tenant42")
//!         .build()?;
//!
//!     let files = vec![UploadFile::new("report.pdf", b"%PDF-1.7".to_vec())];
//!     let stored = client.upload_files("docs", &files).await?;
//!     println!("stored at {}", stored[0].src);
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use dropzone_client::{DropzoneClient, DropzoneError};
//!
//! # async fn run(client: DropzoneClient) {
//! match client.delete_file("tenant42/docs/report.pdf", None).await {
//!     Ok(()) => println!("deleted"),
//!     Err(DropzoneError::Api { status, data, .. }) => {
//!         eprintln!("server refused with {}: {}", status, data);
//!     }
//!     Err(e) => eprintln!("request failed: {}", e),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{DropzoneClient, DropzoneClientBuilder};
pub use config::DropzoneConfig;
pub use errors::{DropzoneError, DropzoneResult};
pub use services::FilesService;
pub use types::{Envelope, Meta, StoredFile, UploadFile};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
