//! Wire shape of the stored records: what the JSON store and `larder schema`
//! expose must decode back and satisfy the generated schema.

use std::collections::BTreeMap;

use chrono::Utc;
use larder_core::drafts::*;
use larder_core::entities::*;
use larder_core::enums::*;
use larder_core::results::*;
use larder_core::store::StoreSnapshot;
use pretty_assertions::assert_eq;
use schemars::{JsonSchema, schema_for};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encode `value`, check it against its schema, decode it again.
fn wire_json<T>(value: &T) -> serde_json::Value
where
    T: Serialize + DeserializeOwned + JsonSchema + PartialEq + std::fmt::Debug,
{
    let json = serde_json::to_value(value).unwrap();

    let schema = serde_json::to_value(schema_for!(T)).unwrap();
    let validator = jsonschema::validator_for(&schema).unwrap();
    let problems: Vec<String> = validator.iter_errors(&json).map(|e| e.to_string()).collect();
    assert!(problems.is_empty(), "{json} violates its schema: {problems:?}");

    let back: T = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(&back, value);
    json
}

#[test]
fn allergen_enums_are_snake_case() {
    let json = wire_json(&Allergen {
        id: "alg-a3f8b2c1".into(),
        name: "milk".into(),
        category: "dairy".into(),
        severity: Severity::Medium,
        status: EntityStatus::Active,
        is_custom: false,
    });
    assert_eq!(json["severity"], "medium");
    assert_eq!(json["status"], "active");
}

#[test]
fn menu_item_keeps_ingredient_order() {
    let json = wire_json(&MenuItem {
        id: "mnu-deadbeef".into(),
        name: "Caesar Salad".into(),
        ingredient_ids: vec!["ing-2".into(), "ing-1".into()],
        status: EntityStatus::Active,
    });
    assert_eq!(json["ingredient_ids"], serde_json::json!(["ing-2", "ing-1"]));
}

#[test]
fn catalog_object_carries_raw_attributes() {
    let json = wire_json(&ExternalCatalogItem {
        id: "7NQW3AZLPTV3IOBF".into(),
        kind: CatalogObjectKind::Item,
        name: "Green Curry".into(),
        description: "Made with coconut milk and basil".into(),
        category_ref: Some("CURRIES".into()),
        parent_ref: None,
        custom_attributes: BTreeMap::from([
            ("ingredients".to_string(), serde_json::json!("chicken, bamboo shoots")),
            ("spice_level".to_string(), serde_json::json!(3)),
        ]),
    });
    assert_eq!(json["custom_attributes"]["spice_level"], 3);
}

#[test]
fn mapping_status_and_timestamp() {
    let json = wire_json(&SyncMapping {
        external_id: "7NQW3AZLPTV3IOBF".into(),
        local_id: Some("mnu-deadbeef".into()),
        sync_status: SyncStatus::Synced,
        owner_id: "owner-1".into(),
        source_description: "Made with coconut milk".into(),
        source_category: Some("Curries".into()),
        updated_at: Utc::now(),
    });
    assert_eq!(json["sync_status"], "synced");
    assert!(json["updated_at"].is_string());
}

#[test]
fn draft_batch_file_shape() {
    let json = wire_json(&DraftBatch {
        allergens: vec![AllergenDraft {
            name: "fish".into(),
            category: "seafood".into(),
            severity: Severity::High,
        }],
        ingredients: vec![IngredientDraft {
            name: "salmon".into(),
            category: IngredientCategory::Seafood,
            expiry_days_hint: Some(2),
            allergen_names: vec!["fish".into()],
        }],
        menu_items: vec![MenuItemDraft::named("Salmon Bowl").with_ingredients(["salmon"])],
    });
    assert_eq!(json["ingredients"][0]["category"], "seafood");
    assert_eq!(json["menu_items"][0]["ingredient_names"][0], "salmon");
}

#[test]
fn validation_result_with_duplicates() {
    wire_json(&ValidationResult {
        is_valid: false,
        errors: vec![ValidationIssue {
            kind: EntityKind::Ingredient,
            index: 0,
            field: "name".into(),
            message: "name is required".into(),
        }],
        warnings: vec![],
        duplicates: vec![DuplicateGroup {
            kind: EntityKind::Allergen,
            normalized_name: "egg".into(),
            names: vec!["Egg".into(), "eggs".into()],
            indices: vec![0, 1],
        }],
        conflicts: vec![],
        suggestions: vec!["merge duplicate allergen 'eggs' into 'Egg'".into()],
    });
}

#[test]
fn empty_store_snapshot() {
    let json = wire_json(&StoreSnapshot::default());
    assert_eq!(json["allergens"], serde_json::json!([]));
}
