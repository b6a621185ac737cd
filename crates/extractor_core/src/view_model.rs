use std::sync::Arc;

use crate::{AttemptId, ExtractionResult, Phase, ResultTab};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub file_name: String,
    pub content_type: String,
    pub byte_len: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttemptViewModel {
    pub phase: Phase,
    pub attempt_id: AttemptId,
    pub document: Option<DocumentView>,
    pub can_submit: bool,
    pub error_message: Option<String>,
    pub rejected: bool,
    pub result: Option<Arc<ExtractionResult>>,
    pub result_tab: ResultTab,
    pub dirty: bool,
}
