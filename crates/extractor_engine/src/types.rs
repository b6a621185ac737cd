use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uploading,
    Receiving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub request_id: RequestId,
    pub stage: Stage,
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(UploadProgress),
    UploadCompleted {
        request_id: RequestId,
        result: Result<UploadOutput, UploadError>,
    },
}

/// A document ready to be sent as the `file` part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub content: Arc<Vec<u8>>,
}

/// A successful (2xx) response, body not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutput {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct UploadError {
    pub kind: FailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True when the service answered; false when the request never completed.
    pub fn is_service_response(&self) -> bool {
        matches!(
            self.kind,
            FailureKind::HttpStatus(_) | FailureKind::InvalidResponse
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    InvalidRequest,
    HttpStatus(u16),
    InvalidResponse,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Body of the service health endpoint. Every field is optional so older
/// or newer services still produce a report.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub status: Option<String>,
    pub model: Option<String>,
    pub api_key_configured: Option<bool>,
    pub ocr_available: Option<bool>,
    pub max_pdf_size_mb: Option<f64>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }
}
