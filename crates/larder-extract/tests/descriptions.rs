//! End-to-end extraction over realistic menu descriptions.

use larder_extract::{SignalExtractor, TextSignalExtractor};
use pretty_assertions::assert_eq;

fn has(list: &[String], name: &str) -> bool {
    list.iter().any(|n| n == name)
}

#[test]
fn thai_curry_description() {
    let result = TextSignalExtractor::new().extract(
        "Green curry made with coconut milk, fish sauce and Thai basil. Topped with peanuts.",
    );
    assert_eq!(result.matched_pattern.as_deref(), Some("with "));
    assert_eq!(
        result.ingredient_names,
        vec!["coconut milk", "fish sauce", "thai basil"]
    );
    assert!(has(&result.allergen_names, "fish"));
    assert!(has(&result.allergen_names, "peanuts"));
    assert!(!has(&result.allergen_names, "milk"));
}

#[test]
fn contains_statement_lists_allergens() {
    let result = TextSignalExtractor::new().extract("Brownie. Contains: wheat, eggs, walnuts.");
    assert_eq!(result.matched_pattern.as_deref(), Some("contains:"));
    assert_eq!(result.ingredient_names, vec!["wheat", "eggs", "walnuts"]);
    for allergen in ["wheat", "eggs", "tree nuts"] {
        assert!(has(&result.allergen_names, allergen), "missing {allergen}");
    }
}

#[test]
fn empty_text_yields_base_confidence() {
    let result = TextSignalExtractor::new().extract("");
    assert!(result.ingredient_names.is_empty());
    assert!(result.allergen_names.is_empty());
    assert!((result.confidence - 0.5).abs() < f64::EPSILON);
}

#[test]
fn extraction_is_deterministic() {
    let extractor = TextSignalExtractor::new();
    let text = "Ingredients: shrimp, garlic butter, parsley";
    assert_eq!(extractor.extract(text), extractor.extract(text));
}

struct FixedExtractor;

impl SignalExtractor for FixedExtractor {
    fn extract(&self, _text: &str) -> larder_core::results::ExtractionResult {
        larder_core::results::ExtractionResult::default()
    }
}

#[test]
fn fact_lookups_default_to_unknown() {
    assert!(FixedExtractor.ingredient_facts("salmon").is_none());
    assert!(FixedExtractor.allergen_facts("fish").is_none());
}
