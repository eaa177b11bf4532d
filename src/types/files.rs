//! File types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Metadata of a file stored on the server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// File name including extension.
    pub name: String,

    /// Location of the file; pass it back to delete the file.
    pub src: String,

    /// MIME type or category.
    #[serde(rename = "type")]
    pub file_type: String,

    /// File name without its extension.
    pub name_without_extension: String,

    /// Size in megabytes.
    #[serde(rename = "sizeInMB")]
    pub size_in_mb: f64,

    /// Preview or thumbnail URL.
    pub preview: String,
}

/// A file to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    /// File name sent with the part.
    pub filename: String,
    /// MIME type of the content.
    pub content_type: String,
    /// File content.
    pub data: Bytes,
}

impl UploadFile {
    /// Creates an upload, inferring the content type from the file name.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        let content_type = detect_content_type(&filename);
        Self {
            filename,
            content_type,
            data: data.into(),
        }
    }

    /// Overrides the inferred content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the content length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the file has no content.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Detects content type from filename.
fn detect_content_type(filename: &str) -> String {
    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return mime::APPLICATION_OCTET_STREAM.to_string(),
    };

    match ext.as_str() {
        "png" => mime::IMAGE_PNG.to_string(),
        "jpg" | "jpeg" => mime::IMAGE_JPEG.to_string(),
        "gif" => mime::IMAGE_GIF.to_string(),
        "bmp" => mime::IMAGE_BMP.to_string(),
        "svg" => mime::IMAGE_SVG.to_string(),
        "webp" => "image/webp".to_string(),
        "pdf" => mime::APPLICATION_PDF.to_string(),
        "json" => mime::APPLICATION_JSON.to_string(),
        "txt" => mime::TEXT_PLAIN.to_string(),
        "csv" => mime::TEXT_CSV.to_string(),
        "html" | "htm" => mime::TEXT_HTML.to_string(),
        "mp3" => "audio/mpeg".to_string(),
        "wav" => "audio/wav".to_string(),
        "mp4" => "video/mp4".to_string(),
        "webm" => "video/webm".to_string(),
        "zip" => "application/zip".to_string(),
        _ => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}
