//! Extractor core: pure attempt state machine, result model and projections.
mod document;
mod effect;
mod error;
mod msg;
mod projection;
mod result;
mod state;
mod update;
mod view_model;

pub use document::{is_accepted_content_type, Document, ACCEPTED_CONTENT_TYPE};
pub use effect::Effect;
pub use error::{ErrorKind, ExtractionError};
pub use msg::Msg;
pub use projection::{
    canonical_decimal, derive_allergen_chips, derive_notices, derive_nutrition_rows,
    derive_product_facts, AllergenChip, ChipTone, DisplayRow, BASIS_PLACEHOLDER, TRACE_MARKER,
};
pub use result::{
    parse_extraction_result, AllergenDeclaration, Basis, ExtractionResult, Measure, Nutrition,
    Quantity, ResultParseError, Severity,
};
pub use state::{AttemptId, AttemptState, Phase, ResultTab};
pub use update::update;
pub use view_model::{AttemptViewModel, DocumentView};
