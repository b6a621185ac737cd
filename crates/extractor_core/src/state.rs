use std::sync::Arc;

use extractor_logging::{extractor_debug, extractor_info};

use crate::view_model::{AttemptViewModel, DocumentView};
use crate::{Document, ExtractionError, ExtractionResult};

/// Identity of one submission. Bumped whenever a newer action supersedes
/// the current attempt, so late responses can be recognised and dropped.
pub type AttemptId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Ready,
    InFlight,
    Succeeded,
    Failed,
}

/// Secondary view selector shown alongside a successful result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTab {
    #[default]
    Overview,
    Allergens,
    Nutrition,
    Raw,
}

// Result and failure live inside the variant so they can never coexist.
#[derive(Debug, Clone, PartialEq, Default)]
enum Status {
    #[default]
    Idle,
    Ready,
    InFlight,
    Succeeded(Arc<ExtractionResult>),
    Failed(ExtractionError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttemptState {
    document: Option<Document>,
    status: Status,
    attempt_id: AttemptId,
    rejection: Option<ExtractionError>,
    result_tab: ResultTab,
    dirty: bool,
}

impl AttemptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.status {
            Status::Idle => Phase::Idle,
            Status::Ready => Phase::Ready,
            Status::InFlight => Phase::InFlight,
            Status::Succeeded(_) => Phase::Succeeded,
            Status::Failed(_) => Phase::Failed,
        }
    }

    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn result(&self) -> Option<&Arc<ExtractionResult>> {
        match &self.status {
            Status::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ExtractionError> {
        match &self.status {
            Status::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// The last client-side rejection, kept apart from the phase.
    pub fn rejection(&self) -> Option<&ExtractionError> {
        self.rejection.as_ref()
    }

    /// Message to surface to the user: an attempt failure, otherwise a
    /// pending rejection.
    pub fn error_message(&self) -> Option<&str> {
        self.failure()
            .or(self.rejection.as_ref())
            .map(|error| error.message.as_str())
    }

    pub fn result_tab(&self) -> ResultTab {
        self.result_tab
    }

    pub fn can_submit(&self) -> bool {
        self.document.is_some() && self.phase() != Phase::InFlight
    }

    /// True once the attempt has resolved one way or the other.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase(), Phase::Succeeded | Phase::Failed)
    }

    pub fn view(&self) -> AttemptViewModel {
        AttemptViewModel {
            phase: self.phase(),
            attempt_id: self.attempt_id,
            document: self.document.as_ref().map(|doc| DocumentView {
                file_name: doc.file_name.clone(),
                content_type: doc.content_type.clone(),
                byte_len: doc.byte_len(),
            }),
            can_submit: self.can_submit(),
            error_message: self.error_message().map(ToOwned::to_owned),
            rejected: self.rejection.is_some(),
            result: self.result().cloned(),
            result_tab: self.result_tab,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn select_document(&mut self, document: Document) {
        if !document.is_accepted() {
            extractor_debug!(
                "Rejected document {} with content type {:?}",
                document.file_name,
                document.content_type
            );
            self.rejection = Some(ExtractionError::invalid_file_type(&document.content_type));
            self.dirty = true;
            return;
        }

        if matches!(self.status, Status::InFlight) {
            extractor_info!(
                "Attempt {} superseded by selection of {}",
                self.attempt_id,
                document.file_name
            );
        }
        self.next_attempt();
        self.document = Some(document);
        self.status = Status::Ready;
        self.rejection = None;
        self.dirty = true;
    }

    /// Moves to `InFlight` and hands back what must be sent, or `None` when
    /// submitting is not allowed right now.
    pub(crate) fn begin_submit(&mut self) -> Option<(AttemptId, Document)> {
        if !self.can_submit() {
            return None;
        }
        let document = self.document.clone()?;
        self.next_attempt();
        self.status = Status::InFlight;
        self.rejection = None;
        self.dirty = true;
        Some((self.attempt_id, document))
    }

    pub(crate) fn apply_success(&mut self, attempt_id: AttemptId, result: Arc<ExtractionResult>) {
        if !self.accepts_response(attempt_id) {
            return;
        }
        self.status = Status::Succeeded(result);
        self.result_tab = ResultTab::default();
        self.dirty = true;
    }

    pub(crate) fn apply_failure(&mut self, attempt_id: AttemptId, error: ExtractionError) {
        if !self.accepts_response(attempt_id) {
            return;
        }
        self.status = Status::Failed(error);
        self.dirty = true;
    }

    pub(crate) fn select_tab(&mut self, tab: ResultTab) {
        if self.phase() != Phase::Succeeded || self.result_tab == tab {
            return;
        }
        self.result_tab = tab;
        self.dirty = true;
    }

    pub(crate) fn reset(&mut self) {
        self.next_attempt();
        self.document = None;
        self.status = Status::Idle;
        self.rejection = None;
        self.result_tab = ResultTab::default();
        self.dirty = true;
    }

    fn accepts_response(&self, attempt_id: AttemptId) -> bool {
        if !matches!(self.status, Status::InFlight) || attempt_id != self.attempt_id {
            extractor_debug!(
                "Discarding stale response for attempt {} (current {}, phase {:?})",
                attempt_id,
                self.attempt_id,
                self.phase()
            );
            return false;
        }
        true
    }

    fn next_attempt(&mut self) {
        self.attempt_id = self.attempt_id.wrapping_add(1);
    }
}
