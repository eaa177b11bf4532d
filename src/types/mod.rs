//! Type definitions for the Dropzone API.

mod envelope;
mod files;

pub use envelope::{Envelope, Meta};
pub use files::{StoredFile, UploadFile};
