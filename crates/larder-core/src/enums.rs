//! Status enums, severity levels and catalog object kinds for Larder.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How serious a reaction to an allergen usually is.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityStatus
// ---------------------------------------------------------------------------

/// Lifecycle status shared by allergens and menu items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
}

impl EntityStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SyncStatus
// ---------------------------------------------------------------------------

/// State of one external-to-local mapping.
///
/// ```text
/// pending → synced
///         → failed → synced (a later run succeeds)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CatalogObjectKind
// ---------------------------------------------------------------------------

/// Kind of object in the external point-of-sale catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CatalogObjectKind {
    Item,
    Variation,
    Category,
}

impl CatalogObjectKind {
    /// Parse the provider's wire type (`ITEM`, `ITEM_VARIATION`, `CATEGORY`).
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "ITEM" => Some(Self::Item),
            "ITEM_VARIATION" => Some(Self::Variation),
            "CATEGORY" => Some(Self::Category),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Variation => "variation",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for CatalogObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IngredientCategory
// ---------------------------------------------------------------------------

/// Coarse storage category of an ingredient, used for the shelf-life hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Produce,
    Dairy,
    Meat,
    Seafood,
    DryGoods,
    #[default]
    Other,
}

impl IngredientCategory {
    /// Heuristic shelf life in days. Not authoritative; editable downstream.
    #[must_use]
    pub const fn expiry_days_hint(self) -> u32 {
        match self {
            Self::Produce => 5,
            Self::Dairy | Self::Other => 7,
            Self::Meat => 3,
            Self::Seafood => 2,
            Self::DryGoods => 180,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Produce => "produce",
            Self::Dairy => "dairy",
            Self::Meat => "meat",
            Self::Seafood => "seafood",
            Self::DryGoods => "dry_goods",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_kind_from_wire() {
        assert_eq!(CatalogObjectKind::from_wire("ITEM"), Some(CatalogObjectKind::Item));
        assert_eq!(
            CatalogObjectKind::from_wire("ITEM_VARIATION"),
            Some(CatalogObjectKind::Variation)
        );
        assert_eq!(
            CatalogObjectKind::from_wire("CATEGORY"),
            Some(CatalogObjectKind::Category)
        );
        assert_eq!(CatalogObjectKind::from_wire("TAX"), None);
    }

    #[test]
    fn expiry_hints_by_category() {
        assert_eq!(IngredientCategory::Seafood.expiry_days_hint(), 2);
        assert_eq!(IngredientCategory::Meat.expiry_days_hint(), 3);
        assert_eq!(IngredientCategory::Produce.expiry_days_hint(), 5);
        assert_eq!(IngredientCategory::Dairy.expiry_days_hint(), 7);
        assert_eq!(IngredientCategory::DryGoods.expiry_days_hint(), 180);
    }

    #[test]
    fn severity_serializes_snake_case() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"high\"");
        assert_eq!(Severity::default(), Severity::Medium);
    }
}
