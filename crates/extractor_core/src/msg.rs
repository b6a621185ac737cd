use std::sync::Arc;

use crate::{AttemptId, Document, ExtractionError, ExtractionResult, ResultTab};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a document.
    DocumentSelected(Document),
    /// User clicked Submit.
    SubmitRequested,
    /// Service returned a parsed result for an attempt.
    ExtractionSucceeded {
        attempt_id: AttemptId,
        result: Arc<ExtractionResult>,
    },
    /// Request for an attempt failed (transport, status or unreadable body).
    ExtractionFailed {
        attempt_id: AttemptId,
        error: ExtractionError,
    },
    /// User switched the result view.
    ResultTabSelected(ResultTab),
    /// User cleared the view.
    ResetRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
