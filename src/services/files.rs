//! File upload, listing and deletion.

use serde::de::IgnoredAny;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::errors::DropzoneResult;
use crate::transport::{MultipartPart, RequestExecutor};
use crate::types::{Envelope, StoredFile, UploadFile};

/// Form field every uploaded file is appended under.
const FILES_FIELD: &str = "files";

/// File operations service.
pub struct FilesService {
    executor: Arc<RequestExecutor>,
    base_path: String,
}

impl FilesService {
    /// Creates a new files service.
    pub fn new(executor: Arc<RequestExecutor>, base_path: impl Into<String>) -> Self {
        Self {
            executor,
            base_path: base_path.into(),
        }
    }

    /// Uploads `files` under `path`, relative to the base path.
    ///
    /// Returns the metadata of the stored files, or an empty list when the
    /// server sends no data. An empty `files` slice is sent as-is.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_files(
        &self,
        path: &str,
        files: &[UploadFile],
    ) -> DropzoneResult<Vec<StoredFile>> {
        let parts = files
            .iter()
            .map(|file| MultipartPart::File {
                name: FILES_FIELD.to_string(),
                filename: file.filename.clone(),
                content_type: file.content_type.clone(),
                data: file.data.clone(),
            })
            .collect();

        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            mime::MULTIPART_FORM_DATA.to_string(),
        );

        let envelope: Envelope<Vec<StoredFile>> = self
            .executor
            .upload(&self.with_path_endpoint(path), parts, Some(headers))
            .await?;

        Ok(envelope.into_data_or_default())
    }

    /// Lists the files stored under `path`, relative to the base path.
    ///
    /// A null `data` field yields an empty list.
    #[instrument(skip(self))]
    pub async fn get_files(&self, path: &str) -> DropzoneResult<Vec<StoredFile>> {
        let envelope: Envelope<Vec<StoredFile>> = self
            .executor
            .get(&self.with_path_endpoint(path), None)
            .await?;

        Ok(envelope.into_data_or_default())
    }

    /// Deletes the file at `src`, along with its preview when given.
    ///
    /// An empty `preview` is treated as absent. Any successful response body
    /// is discarded.
    #[instrument(skip(self))]
    pub async fn delete_file(&self, src: &str, preview: Option<&str>) -> DropzoneResult<()> {
        let query = match preview {
            Some(preview) if !preview.is_empty() => format!("?src={}&preview={}", src, preview),
            _ => format!("?src={}", src),
        };

        let _: IgnoredAny = self
            .executor
            .delete(&format!("/files{}", query), None)
            .await?;

        Ok(())
    }

    /// Returns the base path.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Prefixes `path` with the base path.
    pub fn final_path(&self, path: &str) -> String {
        format!("{}/{}", self.base_path, path)
    }

    fn with_path_endpoint(&self, path: &str) -> String {
        format!("/files/with-path?path={}", self.final_path(path))
    }
}

impl std::fmt::Debug for FilesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilesService")
            .field("base_path", &self.base_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DropzoneError;
    use crate::mocks::{fixtures, MockAuth, MockResponse, MockTransport};
    use crate::transport::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn create_service(transport: Arc<MockTransport>, base_path: &str) -> FilesService {
        let executor = RequestExecutor::new(transport, Arc::new(MockAuth::new("test-key")), Vec::new());
        FilesService::new(Arc::new(executor), base_path)
    }

    #[tokio::test]
    async fn test_upload_files_returns_data() {
        let transport = Arc::new(MockTransport::new());
        let stored = vec![fixtures::stored_file("tenant42/photos", "cat.png")];
        transport.queue_json(&fixtures::envelope(&stored));

        let service = create_service(transport.clone(), "tenant42");
        let files = vec![
            UploadFile::new("cat.png", b"png-bytes".to_vec()),
            UploadFile::new("dog.jpg", b"jpg-bytes".to_vec()),
        ];

        let result = service.upload_files("photos", &files).await.unwrap();
        assert_eq!(result, stored);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/files/with-path?path=tenant42/photos");
        assert_eq!(request.headers.get("x-api-key"), Some(&"test-key".to_string()));
        assert_eq!(
            request.headers.get("content-type"),
            Some(&"multipart/form-data".to_string())
        );

        let parts = request.parts.unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.name() == "files"));
        match &parts[1] {
            MultipartPart::File {
                filename,
                content_type,
                data,
                ..
            } => {
                assert_eq!(filename, "dog.jpg");
                assert_eq!(content_type, "image/jpeg");
                assert_eq!(&data[..], b"jpg-bytes");
            }
            other => panic!("Expected file part, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_no_files_sends_empty_form() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&json!({"data": null, "meta": {"message": "", "status": 200, "ok": true}}));

        let service = create_service(transport.clone(), "tenant42");
        let result = service.upload_files("docs", &[]).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(transport.request_count(), 1);
        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/files/with-path?path=tenant42/docs");
        assert_eq!(request.parts.map(|p| p.len()), Some(0));
    }

    #[tokio::test]
    async fn test_get_files_returns_data() {
        let transport = Arc::new(MockTransport::new());
        let stored = vec![
            fixtures::stored_file("tenant42/docs", "a.pdf"),
            fixtures::stored_file("tenant42/docs", "b.pdf"),
        ];
        transport.queue_json(&fixtures::envelope(&stored));

        let service = create_service(transport.clone(), "tenant42");
        let result = service.get_files("docs").await.unwrap();

        assert_eq!(result, stored);
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/files/with-path?path=tenant42/docs");
        assert!(request.body.is_none());
        assert_eq!(request.headers.get("x-api-key"), Some(&"test-key".to_string()));
    }

    #[tokio::test]
    async fn test_get_files_null_data_is_empty() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&json!({"data": null, "meta": {"message": "empty", "status": 200, "ok": true}}));

        let service = create_service(transport, "tenant42");
        let result = service.get_files("docs").await.unwrap();

        assert_eq!(result, Vec::<StoredFile>::new());
    }

    #[tokio::test]
    async fn test_get_files_error_carries_body() {
        let transport = Arc::new(MockTransport::new());
        let body = json!({"data": null, "meta": {"message": "Invalid API key", "status": 401, "ok": false}});
        transport.queue(MockResponse::json(&body).with_status(401));

        let service = create_service(transport, "tenant42");
        let error = service.get_files("docs").await.unwrap_err();

        assert!(matches!(error, DropzoneError::Api { status: 401, .. }));
        assert_eq!(error.data(), Some(&body));
    }

    #[tokio::test]
    async fn test_delete_file_without_preview() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&json!({"data": null, "meta": {"message": "deleted", "status": 200, "ok": true}}));

        let service = create_service(transport.clone(), "tenant42");
        service.delete_file("a/b.png", None).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path, "/files?src=a/b.png");
        assert_eq!(request.headers.get("x-api-key"), Some(&"test-key".to_string()));
    }

    #[tokio::test]
    async fn test_delete_file_with_preview() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&json!({"data": null, "meta": {"message": "deleted", "status": 200, "ok": true}}));

        let service = create_service(transport.clone(), "tenant42");
        service
            .delete_file("a/b.png", Some("a/b-preview.png"))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/files?src=a/b.png&preview=a/b-preview.png");
    }

    #[tokio::test]
    async fn test_delete_file_empty_preview_is_omitted() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&json!({"data": null}));

        let service = create_service(transport.clone(), "tenant42");
        service.delete_file("a/b.png", Some("")).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/files?src=a/b.png");
    }

    #[tokio::test]
    async fn test_delete_file_ignores_non_envelope_body() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&json!("deleted"));
        transport.queue_json(&json!([]));
        transport.queue_json(&json!(true));

        let service = create_service(transport.clone(), "tenant42");
        for _ in 0..3 {
            service.delete_file("a/b.png", None).await.unwrap();
        }
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_get_files_tolerates_null_meta_fields() {
        let transport = Arc::new(MockTransport::new());
        let stored = vec![fixtures::stored_file("tenant42/docs", "a.pdf")];
        transport.queue_json(&json!({
            "data": stored,
            "meta": {"message": null, "status": 200, "ok": true}
        }));

        let service = create_service(transport, "tenant42");
        let result = service.get_files("docs").await.unwrap();

        assert_eq!(result, stored);
    }

    #[tokio::test]
    async fn test_delete_file_empty_body_succeeds() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::text(204, ""));

        let service = create_service(transport, "tenant42");
        assert!(service.delete_file("a/b.png", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_file_error_propagates() {
        let transport = Arc::new(MockTransport::new());
        let body = json!({"data": null, "meta": {"message": "File not found", "status": 404, "ok": false}});
        transport.queue(MockResponse::json(&body).with_status(404));

        let service = create_service(transport, "tenant42");
        let error = service.delete_file("missing.png", None).await.unwrap_err();

        assert_eq!(error.status(), Some(404));
        assert_eq!(error.data(), Some(&body));
        assert!(error.to_string().starts_with("DELETE /files?src=missing.png"));
    }
}
