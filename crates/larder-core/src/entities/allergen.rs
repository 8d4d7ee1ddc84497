use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityStatus, Severity};

/// An allergen known to the local store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Allergen {
    pub id: String,
    pub name: String,
    /// Free-form grouping such as `dairy`, `seafood`, `nut`.
    pub category: String,
    pub severity: Severity,
    pub status: EntityStatus,
    /// `true` when the allergen is not one of the built-in major allergens.
    pub is_custom: bool,
}
