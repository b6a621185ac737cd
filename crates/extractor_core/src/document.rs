use std::sync::Arc;

/// The only media type the extraction service accepts.
pub const ACCEPTED_CONTENT_TYPE: &str = "application/pdf";

/// A document chosen by the user, as declared by whoever picked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub content: Arc<Vec<u8>>,
}

impl Document {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content: Arc::new(content),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.content.len()
    }

    pub fn is_accepted(&self) -> bool {
        is_accepted_content_type(&self.content_type)
    }
}

/// Compares the essence of a declared content type (parameters such as
/// `; charset=...` are ignored) against [`ACCEPTED_CONTENT_TYPE`].
pub fn is_accepted_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    essence.eq_ignore_ascii_case(ACCEPTED_CONTENT_TYPE)
}
