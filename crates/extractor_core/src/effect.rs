use crate::{AttemptId, Document};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the document to the extraction service. The outcome must come
    /// back tagged with the same `attempt_id`.
    SubmitDocument {
        attempt_id: AttemptId,
        document: Document,
    },
}
