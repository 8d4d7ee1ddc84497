use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An ingredient known to the local store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Heuristic shelf life in days, derived from the ingredient category.
    pub expiry_days_hint: u32,
    #[serde(default)]
    pub allergen_ids: Vec<String>,
}
