//! Ephemeral result types returned to callers. Never persisted.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured facts pulled from one free-text description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ExtractionResult {
    pub ingredient_names: Vec<String>,
    pub allergen_names: Vec<String>,
    /// Heuristic reliability estimate in `[0, 1]`.
    pub confidence: f64,
    /// The labeled pattern that produced the ingredient list, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
}

/// Which entity list an issue or duplicate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Allergen,
    Ingredient,
    MenuItem,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allergen => "allergen",
            Self::Ingredient => "ingredient",
            Self::MenuItem => "menu_item",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural or reference problem found in a batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: EntityKind,
    /// Position in the input list.
    pub index: usize,
    pub field: String,
    pub message: String,
}

/// Several drafts in one list that normalize to the same name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub kind: EntityKind,
    pub normalized_name: String,
    pub names: Vec<String>,
    pub indices: Vec<usize>,
}

/// A draft whose name matches an existing local record under a different spelling.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NamingConflict {
    pub kind: EntityKind,
    pub remote_name: String,
    pub local_id: String,
    pub local_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationResult {
    /// `true` iff `errors` is empty. Duplicates and warnings never block.
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub duplicates: Vec<DuplicateGroup>,
    #[serde(default)]
    pub conflicts: Vec<NamingConflict>,
    pub suggestions: Vec<String>,
}
