//! Pure projections from an [`ExtractionResult`] to display-ready records.
//!
//! Nothing here fails: missing or odd input simply produces fewer rows.
//! Presence is explicit (absent, `null`, or blank after coercion); zero and
//! `false` are values, not gaps.

use serde_json::Value;

use crate::{AllergenDeclaration, Basis, ExtractionResult, Measure, Nutrition, Quantity, Severity};

/// Shown in place of an unknown or missing nutrition basis.
pub const BASIS_PLACEHOLDER: &str = "—";
/// Appended to the label of an allergen that may only be present as traces.
pub const TRACE_MARKER: &str = " (traces)";
const SOURCE_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
    /// Sub-rows such as "of which sugars" sit under their parent.
    pub indented: bool,
}

impl DisplayRow {
    fn new(label: &str, value: String, indented: bool) -> Self {
        Self {
            label: label.to_string(),
            value,
            indented,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipTone {
    Ok,
    Warn,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergenChip {
    pub label: String,
    pub tone: ChipTone,
}

/// Nutrition table rows in fixed presentation order, basis first.
pub fn derive_nutrition_rows(nutrition: Option<&Nutrition>) -> Vec<DisplayRow> {
    let Some(nutrition) = nutrition else {
        return Vec::new();
    };

    let values: Vec<DisplayRow> = nutrient_fields(nutrition)
        .into_iter()
        .filter_map(|(label, indented, measure)| {
            measure
                .and_then(Measure::display_text)
                .map(|value| DisplayRow::new(label, value, indented))
        })
        .collect();

    let basis = nutrition
        .basis
        .as_deref()
        .filter(|tag| !tag.trim().is_empty());
    if basis.is_none() && values.is_empty() {
        return Vec::new();
    }

    let basis_label = match nutrition.basis_kind() {
        Some(Basis::Per100g) => "100 g",
        Some(Basis::PerServing) => "Per serving",
        None => BASIS_PLACEHOLDER,
    };

    let mut rows = Vec::with_capacity(values.len() + 1);
    rows.push(DisplayRow::new("Basis", basis_label.to_string(), false));
    rows.extend(values);
    rows
}

fn nutrient_fields(n: &Nutrition) -> [(&'static str, bool, Option<&Measure>); 10] {
    [
        ("Energy (kJ)", false, n.energy_kj.as_ref()),
        ("Energy (kcal)", false, n.energy_kcal.as_ref()),
        ("Fat (g)", false, n.fat_g.as_ref()),
        ("of which saturates (g)", true, n.saturated_fat_g.as_ref()),
        ("Carbohydrate (g)", false, n.carbohydrate_g.as_ref()),
        ("of which sugars (g)", true, n.sugars_g.as_ref()),
        ("Protein (g)", false, n.protein_g.as_ref()),
        ("Fibre (g)", false, n.fiber_g.as_ref()),
        ("Salt (g)", false, n.salt_g.as_ref()),
        ("Sodium (g)", false, n.sodium_g.as_ref()),
    ]
}

/// One chip per declaration, in input order.
pub fn derive_allergen_chips(allergens: &[AllergenDeclaration]) -> Vec<AllergenChip> {
    allergens.iter().map(allergen_chip).collect()
}

fn allergen_chip(allergen: &AllergenDeclaration) -> AllergenChip {
    let traces_only = allergen.present && allergen.severity() == Some(Severity::MayContain);
    let tone = if !allergen.present {
        ChipTone::Muted
    } else if traces_only {
        ChipTone::Warn
    } else {
        ChipTone::Ok
    };

    let mut label = allergen.name.clone();
    if traces_only {
        label.push_str(TRACE_MARKER);
    }
    if let Some(source) = present_text(allergen.source.as_deref()) {
        label.push_str(SOURCE_SEPARATOR);
        label.push_str(&source);
    }

    AllergenChip { label, tone }
}

/// Product identity rows: name, brand, net quantity and serving size.
pub fn derive_product_facts(result: &ExtractionResult) -> Vec<DisplayRow> {
    let serving_size = result
        .nutrition
        .as_ref()
        .and_then(|n| n.serving_size.as_ref());
    let candidates = [
        ("Product", present_text(result.product_name.as_deref())),
        ("Brand", present_text(result.brand.as_deref())),
        (
            "Net quantity",
            result.net_quantity.as_ref().and_then(format_quantity),
        ),
        ("Serving size", serving_size.and_then(format_quantity)),
    ];
    candidates
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| DisplayRow::new(label, value, false)))
        .collect()
}

/// Service warnings followed by any diagnostics the service put in `meta`.
pub fn derive_notices(result: &ExtractionResult) -> Vec<String> {
    let mut notices: Vec<String> = result
        .warnings
        .iter()
        .filter_map(|warning| present_text(Some(warning.as_str())))
        .collect();

    for (key, prefix) in [("error", "Service error"), ("validation_error", "Validation issue")] {
        if let Some(Value::String(text)) = result.meta.get(key) {
            if let Some(text) = present_text(Some(text.as_str())) {
                notices.push(format!("{prefix}: {text}"));
            }
        }
    }
    notices
}

/// Canonical decimal text for a number: no trailing `.0`, no negative zero.
pub fn canonical_decimal(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn format_quantity(quantity: &Quantity) -> Option<String> {
    let amount = quantity.amount.as_ref().and_then(Measure::display_text)?;
    match present_text(quantity.unit.as_deref()) {
        Some(unit) => Some(format!("{amount} {unit}")),
        None => Some(amount),
    }
}

fn present_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::canonical_decimal;

    #[test]
    fn whole_numbers_drop_fraction() {
        assert_eq!(canonical_decimal(120.0), "120");
        assert_eq!(canonical_decimal(4.5), "4.5");
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(canonical_decimal(-0.0), "0");
    }

    #[test]
    fn non_finite_is_blank() {
        assert_eq!(canonical_decimal(f64::NAN), "");
        assert_eq!(canonical_decimal(f64::INFINITY), "");
    }
}
