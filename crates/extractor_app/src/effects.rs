use std::sync::Arc;

use extractor_core::{
    parse_extraction_result, Document, Effect, ExtractionError, Msg, ACCEPTED_CONTENT_TYPE,
};
use extractor_engine::{
    EngineEvent, EngineHandle, RequestId, UploadError, UploadOutput, UploadRequest,
    UploadSettings,
};
use extractor_logging::{extractor_debug, extractor_info, extractor_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: UploadSettings) -> Self {
        Self {
            engine: EngineHandle::new(settings),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitDocument {
                    attempt_id,
                    document,
                } => {
                    extractor_info!(
                        "SubmitDocument attempt_id={} file={} bytes={}",
                        attempt_id,
                        document.file_name,
                        document.byte_len()
                    );
                    self.engine.submit(attempt_id, upload_request(document));
                }
            }
        }
    }

    /// Blocks until the engine reports a completed upload. `None` when the
    /// engine has gone away.
    pub fn next_msg(&self) -> Option<Msg> {
        loop {
            match self.engine.recv()? {
                EngineEvent::Progress(progress) => {
                    extractor_debug!(
                        "Upload request_id={} stage={:?} bytes={:?}",
                        progress.request_id,
                        progress.stage,
                        progress.bytes
                    );
                }
                EngineEvent::UploadCompleted { request_id, result } => {
                    return Some(completion_msg(request_id, result));
                }
            }
        }
    }
}

/// The service compares the part's content type verbatim, so an accepted
/// document is always declared with the bare media type.
fn upload_request(document: Document) -> UploadRequest {
    UploadRequest {
        file_name: document.file_name,
        content_type: ACCEPTED_CONTENT_TYPE.to_string(),
        content: document.content,
    }
}

/// Turns a finished upload into the message the state machine expects.
pub fn completion_msg(request_id: RequestId, result: Result<UploadOutput, UploadError>) -> Msg {
    let attempt_id = request_id;
    match result {
        Ok(output) => match parse_extraction_result(&output.body) {
            Ok(parsed) => Msg::ExtractionSucceeded {
                attempt_id,
                result: Arc::new(parsed),
            },
            Err(err) => {
                extractor_warn!("Attempt {} returned an unreadable body: {}", attempt_id, err);
                Msg::ExtractionFailed {
                    attempt_id,
                    error: ExtractionError::service(format!("unreadable response: {err}")),
                }
            }
        },
        Err(err) => {
            extractor_warn!("Attempt {} failed: {}", attempt_id, err);
            let error = if err.is_service_response() {
                ExtractionError::service(err.message)
            } else {
                ExtractionError::transport(err.to_string())
            };
            Msg::ExtractionFailed { attempt_id, error }
        }
    }
}
