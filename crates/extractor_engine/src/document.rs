use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("path has no file name: {0}")]
    MissingFileName(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A document read from disk together with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Reads `path` and declares its content type: the explicit override when
/// given, otherwise a guess from the file extension.
pub fn load_document(
    path: &Path,
    content_type: Option<&str>,
) -> Result<DocumentFile, DocumentError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| DocumentError::MissingFileName(path.to_path_buf()))?;

    let content_type = match content_type.map(str::trim).filter(|ct| !ct.is_empty()) {
        Some(declared) => declared.to_string(),
        None => guess_content_type(path),
    };

    let bytes = fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(DocumentFile {
        file_name,
        content_type,
        bytes,
    })
}

/// Content type implied by the file extension; `application/octet-stream`
/// when unknown.
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
