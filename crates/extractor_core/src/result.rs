//! Wire model of the extraction service response.
//!
//! Every field is optional: anything the service leaves out or sends as
//! `null` deserializes to "no data". Values are kept exactly as received;
//! interpretation (labels, formatting, tones) lives in the projection layer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionResult {
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub net_quantity: Option<Quantity>,
    pub ingredients_text: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub allergens: Vec<AllergenDeclaration>,
    pub nutrition: Option<Nutrition>,
    #[serde(deserialize_with = "lenient_list")]
    pub warnings: Vec<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quantity {
    pub amount: Option<Measure>,
    pub unit: Option<String>,
}

/// A missing or `null` name reads as empty and a missing or `null`
/// `present` as not present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllergenDeclaration {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub present: bool,
    pub source: Option<String>,
    pub contains_or_may_contain: Option<String>,
}

impl AllergenDeclaration {
    pub fn severity(&self) -> Option<Severity> {
        self.contains_or_may_contain
            .as_deref()
            .and_then(Severity::from_tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Contains,
    MayContain,
}

impl Severity {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "contains" => Some(Severity::Contains),
            "may_contain" => Some(Severity::MayContain),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrition {
    pub basis: Option<String>,
    pub energy_kj: Option<Measure>,
    pub energy_kcal: Option<Measure>,
    pub fat_g: Option<Measure>,
    pub saturated_fat_g: Option<Measure>,
    pub carbohydrate_g: Option<Measure>,
    pub sugars_g: Option<Measure>,
    pub protein_g: Option<Measure>,
    pub fiber_g: Option<Measure>,
    pub salt_g: Option<Measure>,
    pub sodium_g: Option<Measure>,
    pub serving_size: Option<Quantity>,
}

impl Nutrition {
    pub fn basis_kind(&self) -> Option<Basis> {
        self.basis.as_deref().and_then(Basis::from_tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Per100g,
    PerServing,
}

impl Basis {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "per_100g" => Some(Basis::Per100g),
            "per_serving" => Some(Basis::PerServing),
            _ => None,
        }
    }
}

/// A loosely typed measured value: usually a number, occasionally text the
/// service could not normalize. Any other JSON shape is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measure {
    Number(Number),
    Text(String),
    Other(Value),
}

impl Measure {
    /// String coercion used for display. `None` when the coerced text is
    /// empty or whitespace-only.
    pub fn display_text(&self) -> Option<String> {
        let text = match self {
            Measure::Number(value) => match value.as_f64() {
                Some(value) => crate::canonical_decimal(value),
                None => value.to_string(),
            },
            Measure::Text(text) => text.trim().to_string(),
            Measure::Other(Value::Null) => String::new(),
            Measure::Other(Value::String(text)) => text.trim().to_string(),
            Measure::Other(other) => other.to_string(),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResultParseError {
    #[error("response is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("response does not match the expected structure: {0}")]
    Structure(#[source] serde_json::Error),
    #[error("response is not a JSON object")]
    NotAnObject,
}

/// Parses a service response body into an [`ExtractionResult`].
pub fn parse_extraction_result(body: &[u8]) -> Result<ExtractionResult, ResultParseError> {
    let value: Value = serde_json::from_slice(body).map_err(ResultParseError::Json)?;
    if !value.is_object() {
        return Err(ResultParseError::NotAnObject);
    }
    serde_json::from_value(value).map_err(ResultParseError::Structure)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A list where entries of the wrong shape are skipped instead of failing
/// the whole response. `null` reads as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let entries: Vec<Value> = null_as_default(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}
