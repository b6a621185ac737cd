use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected client-side before any request was made.
    InvalidFileType,
    /// The request could not complete (connect, timeout, body read).
    TransportFailure,
    /// The service answered with a non-success status or an unreadable body.
    ServiceFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidFileType => write!(f, "invalid file type"),
            ErrorKind::TransportFailure => write!(f, "transport failure"),
            ErrorKind::ServiceFailure => write!(f, "service failure"),
        }
    }
}

/// A human-readable failure attached to an attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExtractionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ExtractionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_file_type(content_type: &str) -> Self {
        let declared = if content_type.trim().is_empty() {
            "unknown"
        } else {
            content_type.trim()
        };
        Self::new(
            ErrorKind::InvalidFileType,
            format!(
                "wrong file type: expected {}, got {declared}",
                crate::ACCEPTED_CONTENT_TYPE
            ),
        )
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportFailure, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceFailure, message)
    }
}
