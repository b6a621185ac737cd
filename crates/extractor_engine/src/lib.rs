//! Extractor engine: document loading, upload transport and effect execution.
mod document;
mod engine;
mod types;
mod upload;

pub use document::{guess_content_type, load_document, DocumentError, DocumentFile};
pub use engine::EngineHandle;
pub use types::{
    EngineEvent, FailureKind, HealthReport, RequestId, Stage, UploadError, UploadOutput,
    UploadProgress, UploadRequest,
};
pub use upload::{ProgressSink, ReqwestUploader, UploadSettings, Uploader, EXTRACT_PATH, HEALTH_PATH};
