//! Draft entities produced by catalog transformation.
//!
//! Drafts carry names, not IDs: references between them are resolved by the
//! import step against the local store.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{IngredientCategory, Severity};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AllergenDraft {
    pub name: String,
    #[serde(default = "default_allergen_category")]
    pub category: String,
    #[serde(default)]
    pub severity: Severity,
}

fn default_allergen_category() -> String {
    "other".to_string()
}

impl AllergenDraft {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: default_allergen_category(),
            severity: Severity::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngredientDraft {
    pub name: String,
    #[serde(default)]
    pub category: IngredientCategory,
    /// Signed so that malformed input can be reported instead of rejected at parse time.
    pub expiry_days_hint: Option<i64>,
    #[serde(default)]
    pub allergen_names: Vec<String>,
}

impl IngredientDraft {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: IngredientCategory::default(),
            expiry_days_hint: None,
            allergen_names: Vec::new(),
        }
    }

    /// Shelf-life hint to persist: the explicit value if usable, else the category default.
    #[must_use]
    pub fn effective_expiry_days(&self) -> u32 {
        self.expiry_days_hint
            .and_then(|days| u32::try_from(days).ok())
            .unwrap_or_else(|| self.category.expiry_days_hint())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MenuItemDraft {
    /// Source catalog object, when the draft came from a remote catalog.
    pub external_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub ingredient_names: Vec<String>,
    #[serde(default)]
    pub allergen_names: Vec<String>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

const fn default_confidence() -> f64 {
    1.0
}

impl MenuItemDraft {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            external_id: None,
            name: name.into(),
            description: String::new(),
            category: None,
            ingredient_names: Vec::new(),
            allergen_names: Vec::new(),
            confidence: default_confidence(),
        }
    }

    #[must_use]
    pub fn with_ingredients<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredient_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// A batch of drafts, as read from an import file or produced by a transform.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DraftBatch {
    #[serde(default)]
    pub allergens: Vec<AllergenDraft>,
    #[serde(default)]
    pub ingredients: Vec<IngredientDraft>,
    #[serde(default)]
    pub menu_items: Vec<MenuItemDraft>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn effective_expiry_prefers_explicit_value() {
        let mut draft = IngredientDraft::named("salmon");
        draft.category = IngredientCategory::Seafood;
        assert_eq!(draft.effective_expiry_days(), 2);

        draft.expiry_days_hint = Some(4);
        assert_eq!(draft.effective_expiry_days(), 4);

        draft.expiry_days_hint = Some(-1);
        assert_eq!(draft.effective_expiry_days(), 2);
    }

    #[test]
    fn batch_parses_with_defaults() {
        let batch: DraftBatch = serde_json::from_str(
            r#"{
                "allergens": [{"name": "fish"}],
                "menu_items": [{"external_id": null, "name": "Fish Tacos", "category": null}]
            }"#,
        )
        .unwrap();

        assert_eq!(batch.allergens[0], AllergenDraft::named("fish"));
        assert!(batch.ingredients.is_empty());
        assert!((batch.menu_items[0].confidence - 1.0).abs() < f64::EPSILON);
    }
}
