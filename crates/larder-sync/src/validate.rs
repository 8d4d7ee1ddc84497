//! Pre-import batch validation.
//!
//! Structural problems on a single draft are errors and make the batch
//! invalid. Everything else (duplicates, dangling references, local naming
//! conflicts) is advisory.

use std::collections::BTreeMap;

use larder_core::drafts::{AllergenDraft, DraftBatch, IngredientDraft, MenuItemDraft};
use larder_core::results::{
    DuplicateGroup, EntityKind, NamingConflict, ValidationIssue, ValidationResult,
};
use larder_core::store::StoreSnapshot;
use larder_resolve::{NameIndex, normalize};

use crate::local::LocalIndex;

const DEFAULT_MAX_NAME_LENGTH: usize = 120;
const MIN_NAME_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Cross-check references against the lists in the same batch.
    pub strict: bool,
    pub max_name_length: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ValidationOptions {
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncValidator {
    options: ValidationOptions,
}

impl SyncValidator {
    #[must_use]
    pub const fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate three draft lists. `is_valid` is true iff no errors were found.
    #[must_use]
    pub fn validate(
        &self,
        allergens: &[AllergenDraft],
        ingredients: &[IngredientDraft],
        menu_items: &[MenuItemDraft],
    ) -> ValidationResult {
        let mut result = ValidationResult::default();

        for (i, draft) in allergens.iter().enumerate() {
            self.check_name(&mut result, EntityKind::Allergen, i, &draft.name);
        }
        for (i, draft) in ingredients.iter().enumerate() {
            self.check_name(&mut result, EntityKind::Ingredient, i, &draft.name);
            if let Some(days) = draft.expiry_days_hint
                && days < 0
            {
                result.errors.push(issue(
                    EntityKind::Ingredient,
                    i,
                    "expiry_days_hint",
                    format!("must not be negative, got {days}"),
                ));
            }
        }
        for (i, draft) in menu_items.iter().enumerate() {
            self.check_name(&mut result, EntityKind::MenuItem, i, &draft.name);
            if draft.ingredient_names.is_empty() {
                result.warnings.push(issue(
                    EntityKind::MenuItem,
                    i,
                    "ingredient_names",
                    "no ingredients; the menu item will be created without any".to_string(),
                ));
            }
            if !(0.0..=1.0).contains(&draft.confidence) {
                result.errors.push(issue(
                    EntityKind::MenuItem,
                    i,
                    "confidence",
                    format!("must be within [0, 1], got {}", draft.confidence),
                ));
            }
        }

        let allergen_names = allergens.iter().map(|d| d.name.as_str());
        let ingredient_names = ingredients.iter().map(|d| d.name.as_str());
        let menu_item_names = menu_items.iter().map(|d| d.name.as_str());
        find_duplicates(&mut result, EntityKind::Allergen, allergen_names);
        find_duplicates(&mut result, EntityKind::Ingredient, ingredient_names);
        find_duplicates(&mut result, EntityKind::MenuItem, menu_item_names);

        if self.options.strict {
            check_references(&mut result, allergens, ingredients, menu_items);
        }

        result.is_valid = result.errors.is_empty();
        result
    }

    /// Drafts that will resolve to an existing local record spelled
    /// differently. Identical spellings are not conflicts.
    #[must_use]
    pub fn check_conflicts(
        &self,
        batch: &DraftBatch,
        local: &StoreSnapshot,
    ) -> Vec<NamingConflict> {
        let index = LocalIndex::from_records(
            local.allergens.clone(),
            local.ingredients.clone(),
            local.menu_items.clone(),
        );

        let mut conflicts = Vec::new();
        let mut push = |kind: EntityKind, remote: &str, hit: Option<crate::Resolution>| {
            if let Some(hit) = hit
                && hit.name.trim() != remote.trim()
            {
                conflicts.push(NamingConflict {
                    kind,
                    remote_name: remote.to_string(),
                    local_id: hit.id,
                    local_name: hit.name,
                });
            }
        };

        for draft in &batch.allergens {
            push(EntityKind::Allergen, &draft.name, index.allergen(&draft.name));
        }
        for draft in &batch.ingredients {
            push(EntityKind::Ingredient, &draft.name, index.ingredient(&draft.name));
        }
        for draft in &batch.menu_items {
            push(EntityKind::MenuItem, &draft.name, index.menu_item(&draft.name));
        }
        conflicts
    }

    /// [`Self::validate`] plus local naming conflicts and merge suggestions.
    #[must_use]
    pub fn validate_against(&self, batch: &DraftBatch, local: &StoreSnapshot) -> ValidationResult {
        let mut result = self.validate(&batch.allergens, &batch.ingredients, &batch.menu_items);
        let conflicts = self.check_conflicts(batch, local);
        for conflict in &conflicts {
            result.suggestions.push(format!(
                "{} '{}' matches existing '{}' ({}); the existing record will be reused",
                conflict.kind, conflict.remote_name, conflict.local_name, conflict.local_id
            ));
        }
        result.conflicts = conflicts;
        result
    }

    fn check_name(
        &self,
        result: &mut ValidationResult,
        kind: EntityKind,
        index: usize,
        name: &str,
    ) {
        let trimmed = name.trim();
        let length = trimmed.chars().count();
        if trimmed.is_empty() {
            result
                .errors
                .push(issue(kind, index, "name", "name is required".to_string()));
        } else if length > self.options.max_name_length {
            result.errors.push(issue(
                kind,
                index,
                "name",
                format!(
                    "name is {length} characters, maximum is {}",
                    self.options.max_name_length
                ),
            ));
        } else if length < MIN_NAME_LENGTH {
            result.warnings.push(issue(
                kind,
                index,
                "name",
                format!("name '{trimmed}' is suspiciously short"),
            ));
        }
    }
}

fn issue(kind: EntityKind, index: usize, field: &str, message: String) -> ValidationIssue {
    ValidationIssue {
        kind,
        index,
        field: field.to_string(),
        message,
    }
}

fn find_duplicates<'a>(
    result: &mut ValidationResult,
    kind: EntityKind,
    names: impl Iterator<Item = &'a str>,
) {
    let mut groups: BTreeMap<String, (Vec<String>, Vec<usize>)> = BTreeMap::new();
    for (i, name) in names.enumerate() {
        let key = normalize(name);
        if key.is_empty() {
            continue;
        }
        let group = groups.entry(key).or_default();
        group.0.push(name.to_string());
        group.1.push(i);
    }

    for (normalized_name, (names, indices)) in groups {
        if indices.len() < 2 {
            continue;
        }
        result.suggestions.push(format!(
            "Merge duplicate {kind} drafts: {}",
            names.join(", ")
        ));
        result.duplicates.push(DuplicateGroup {
            kind,
            normalized_name,
            names,
            indices,
        });
    }
}

fn check_references(
    result: &mut ValidationResult,
    allergens: &[AllergenDraft],
    ingredients: &[IngredientDraft],
    menu_items: &[MenuItemDraft],
) {
    let allergen_names = NameIndex::from_records(allergens.iter().map(|d| (d.name.as_str(), "")));
    let ingredient_names =
        NameIndex::from_records(ingredients.iter().map(|d| (d.name.as_str(), "")));

    for (i, draft) in ingredients.iter().enumerate() {
        for name in draft.allergen_names.iter().filter(|n| !allergen_names.contains(n)) {
            result.warnings.push(issue(
                EntityKind::Ingredient,
                i,
                "allergen_names",
                format!("allergen '{name}' is not in this batch"),
            ));
        }
    }
    for (i, draft) in menu_items.iter().enumerate() {
        for name in draft.ingredient_names.iter().filter(|n| !ingredient_names.contains(n)) {
            result.warnings.push(issue(
                EntityKind::MenuItem,
                i,
                "ingredient_names",
                format!("ingredient '{name}' is not in this batch"),
            ));
        }
        for name in draft.allergen_names.iter().filter(|n| !allergen_names.contains(n)) {
            result.warnings.push(issue(
                EntityKind::MenuItem,
                i,
                "allergen_names",
                format!("allergen '{name}' is not in this batch"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use larder_core::entities::Allergen;
    use larder_core::enums::{EntityStatus, Severity};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn menu(name: &str, ingredients: &[&str]) -> MenuItemDraft {
        MenuItemDraft::named(name).with_ingredients(ingredients.iter().copied())
    }

    #[test]
    fn clean_batch_is_valid() {
        let result = SyncValidator::default().validate(
            &[AllergenDraft::named("fish")],
            &[IngredientDraft::named("salmon")],
            &[menu("Salmon Plate", &["salmon"])],
        );
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[rstest]
    #[case("", "name is required")]
    #[case("   ", "name is required")]
    fn missing_name_is_an_error(#[case] name: &str, #[case] message: &str) {
        let result = SyncValidator::default().validate(&[AllergenDraft::named(name)], &[], &[]);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].message, message);
        assert_eq!(result.errors[0].field, "name");
    }

    #[test]
    fn overlong_name_is_an_error() {
        let validator = SyncValidator::new(ValidationOptions {
            strict: false,
            max_name_length: 5,
        });
        let result = validator.validate(&[], &[IngredientDraft::named("cardamom")], &[]);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].kind, EntityKind::Ingredient);
    }

    #[test]
    fn short_name_only_warns() {
        let result = SyncValidator::default().validate(&[], &[IngredientDraft::named("X")], &[]);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn negative_expiry_and_bad_confidence_are_errors() {
        let mut ingredient = IngredientDraft::named("milk");
        ingredient.expiry_days_hint = Some(-3);
        let mut item = menu("Latte", &["milk"]);
        item.confidence = 1.5;

        let result = SyncValidator::default().validate(&[], &[ingredient], &[item]);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["expiry_days_hint", "confidence"]);
        assert!(!result.is_valid);
    }

    #[test]
    fn menu_item_without_ingredients_warns() {
        let result = SyncValidator::default().validate(&[], &[], &[menu("Mystery Box", &[])]);
        assert!(result.is_valid);
        assert_eq!(result.warnings[0].field, "ingredient_names");
    }

    #[test]
    fn duplicates_are_grouped_but_advisory() {
        let result = SyncValidator::default().validate(
            &[],
            &[
                IngredientDraft::named("Tomatoes"),
                IngredientDraft::named("basil"),
                IngredientDraft::named("tomato"),
            ],
            &[],
        );
        assert!(result.is_valid);
        assert_eq!(
            result.duplicates,
            vec![DuplicateGroup {
                kind: EntityKind::Ingredient,
                normalized_name: "tomato".into(),
                names: vec!["Tomatoes".into(), "tomato".into()],
                indices: vec![0, 2],
            }]
        );
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn strict_mode_flags_dangling_references() {
        let mut ingredient = IngredientDraft::named("shrimp");
        ingredient.allergen_names = vec!["shellfish".into()];
        let mut item = menu("Shrimp Tacos", &["shrimp", "tortillas"]);
        item.allergen_names = vec!["shellfish".into()];

        let lenient =
            SyncValidator::default().validate(&[], &[ingredient.clone()], &[item.clone()]);
        assert!(lenient.warnings.is_empty());

        let strict = SyncValidator::new(ValidationOptions::strict()).validate(
            &[],
            &[ingredient],
            &[item],
        );
        assert!(strict.is_valid);
        let messages: Vec<_> = strict.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "allergen 'shellfish' is not in this batch",
                "ingredient 'tortillas' is not in this batch",
                "allergen 'shellfish' is not in this batch",
            ]
        );
    }

    #[test]
    fn conflicts_report_different_spellings_only() {
        let local = StoreSnapshot {
            allergens: vec![
                Allergen {
                    id: "alg-00000001".into(),
                    name: "Tree Nuts".into(),
                    category: "nut".into(),
                    severity: Severity::High,
                    status: EntityStatus::Active,
                    is_custom: false,
                },
                Allergen {
                    id: "alg-00000002".into(),
                    name: "fish".into(),
                    category: "seafood".into(),
                    severity: Severity::High,
                    status: EntityStatus::Active,
                    is_custom: false,
                },
            ],
            ..StoreSnapshot::default()
        };
        let batch = DraftBatch {
            allergens: vec![
                AllergenDraft::named("tree nut"),
                AllergenDraft::named("fish"),
                AllergenDraft::named("sesame"),
            ],
            ..DraftBatch::default()
        };

        let result = SyncValidator::default().validate_against(&batch, &local);
        assert_eq!(
            result.conflicts,
            vec![NamingConflict {
                kind: EntityKind::Allergen,
                remote_name: "tree nut".into(),
                local_id: "alg-00000001".into(),
                local_name: "Tree Nuts".into(),
            }]
        );
        assert_eq!(result.suggestions.len(), 1);
        assert!(result.is_valid);
    }
}
