//! Service implementations for the Dropzone API.

mod files;

pub use files::FilesService;
