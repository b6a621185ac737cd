use extractor_core::{
    parse_extraction_result, Basis, ExtractionResult, Measure, ResultParseError, Severity,
};

const FULL_RESPONSE: &str = r#"{
  "product_name": "Zabpelyhes keksz",
  "brand": "Example",
  "net_quantity": {"amount": 200, "unit": "g"},
  "ingredients_text": "búzaliszt, cukor, zabpehely",
  "allergens": [
    {"name": "Gluten", "present": true, "source": "búzaliszt", "contains_or_may_contain": "contains"},
    {"name": "Nuts", "present": true, "source": null, "contains_or_may_contain": "may_contain"},
    {"name": "Fish", "present": false}
  ],
  "nutrition": {
    "basis": "per_100g",
    "energy_kj": 1950, "energy_kcal": 465, "fat_g": 19.5, "saturated_fat_g": null,
    "carbohydrate_g": 65, "sugars_g": "22,5 g", "protein_g": 7.1, "fiber_g": null,
    "salt_g": 0.8, "sodium_g": 0.32, "serving_size": null
  },
  "warnings": [],
  "notes": null,
  "meta": {"confidence": "high", "mode": "text"}
}"#;

#[test]
fn full_response_is_parsed_without_transformation() {
    let result = parse_extraction_result(FULL_RESPONSE.as_bytes()).expect("parse");

    assert_eq!(result.product_name.as_deref(), Some("Zabpelyhes keksz"));
    assert_eq!(result.allergens.len(), 3);
    assert_eq!(result.allergens[0].severity(), Some(Severity::Contains));
    assert_eq!(result.allergens[1].severity(), Some(Severity::MayContain));
    assert_eq!(result.allergens[2].source, None);

    let nutrition = result.nutrition.as_ref().expect("nutrition");
    assert_eq!(nutrition.basis_kind(), Some(Basis::Per100g));
    assert_eq!(nutrition.energy_kj, Some(Measure::Number(1950.into())));
    assert_eq!(nutrition.saturated_fat_g, None);
    assert_eq!(nutrition.sugars_g, Some(Measure::Text("22,5 g".to_string())));
    assert_eq!(result.meta.get("confidence").unwrap(), "high");
}

#[test]
fn absent_and_null_fields_mean_no_data() {
    let result =
        parse_extraction_result(br#"{"allergens": null, "warnings": null, "meta": null}"#)
            .expect("parse");
    assert_eq!(result, ExtractionResult::default());

    let result = parse_extraction_result(b"{}").expect("parse");
    assert_eq!(result, ExtractionResult::default());
}

#[test]
fn unexpected_nutrient_shapes_are_preserved() {
    let result =
        parse_extraction_result(br#"{"nutrition": {"fat_g": true, "protein_g": [1, 2]}}"#)
            .expect("parse");
    let nutrition = result.nutrition.unwrap();

    assert_eq!(nutrition.fat_g.unwrap().display_text().as_deref(), Some("true"));
    assert_eq!(
        nutrition.protein_g.unwrap().display_text().as_deref(),
        Some("[1,2]")
    );
}

#[test]
fn non_object_body_is_rejected() {
    assert!(matches!(
        parse_extraction_result(b"[]"),
        Err(ResultParseError::NotAnObject)
    ));
    assert!(matches!(
        parse_extraction_result(b"null"),
        Err(ResultParseError::NotAnObject)
    ));
}

#[test]
fn malformed_body_is_a_json_error() {
    let err = parse_extraction_result(b"<html>Bad Gateway</html>").unwrap_err();
    assert!(matches!(err, ResultParseError::Json(_)));
    assert!(err.to_string().starts_with("response is not valid JSON"));
}

#[test]
fn wrong_top_level_shape_is_a_structure_error() {
    let err = parse_extraction_result(br#"{"allergens": "milk"}"#).unwrap_err();
    assert!(matches!(err, ResultParseError::Structure(_)));
    assert!(err
        .to_string()
        .starts_with("response does not match the expected structure"));
}

#[test]
fn whole_numbers_keep_their_json_form() {
    let result =
        parse_extraction_result(br#"{"nutrition": {"energy_kcal": 530, "fat_g": 19.5}}"#)
            .expect("parse");
    let json = serde_json::to_string(&result.nutrition).unwrap();
    assert!(json.contains(r#""energy_kcal":530,"#));
    assert!(json.contains(r#""fat_g":19.5"#));
}

#[test]
fn loose_allergen_entries_degrade_to_no_data() {
    let result = parse_extraction_result(
        br#"{
            "product_name": "Oat Bar",
            "nutrition": {"basis": "per_100g", "fat_g": 12},
            "allergens": [
                {"name": "Milk", "present": null},
                {"name": "Soy"},
                {"present": true},
                "Sesame",
                {"name": "Gluten", "present": true}
            ]
        }"#,
    )
    .expect("parse");

    assert_eq!(result.product_name.as_deref(), Some("Oat Bar"));
    assert!(result.nutrition.is_some());
    let allergens: Vec<(&str, bool)> = result
        .allergens
        .iter()
        .map(|a| (a.name.as_str(), a.present))
        .collect();
    assert_eq!(
        allergens,
        vec![("Milk", false), ("Soy", false), ("", true), ("Gluten", true)]
    );
}

#[test]
fn non_string_warnings_are_skipped() {
    let result =
        parse_extraction_result(br#"{"warnings": ["Low OCR confidence", null, 3]}"#)
            .expect("parse");
    assert_eq!(result.warnings, vec!["Low OCR confidence".to_string()]);
}
