//! # larder-extract
//!
//! Pulls candidate ingredient and allergen names out of free-text menu
//! descriptions.
//!
//! Extraction is table-driven and deterministic: a small set of label
//! patterns (`Ingredients:`, `Contains:`, `with ...`) locate an explicit list
//! when one exists, otherwise the text is scanned for known ingredient
//! phrases. Allergen keywords are matched on word boundaries and suppressed
//! by phrases like `coconut milk` or `gluten-free`.

pub mod knowledge;

mod extractor;

pub use extractor::TextSignalExtractor;

use larder_core::enums::{IngredientCategory, Severity};
use larder_core::results::ExtractionResult;

/// What the knowledge tables know about an ingredient name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientFacts {
    pub category: IngredientCategory,
    pub allergens: Vec<String>,
}

/// What the knowledge tables know about an allergen name or keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergenFacts {
    pub canonical_name: String,
    pub category: String,
    pub severity: Severity,
}

/// Source of ingredient/allergen signals for catalog transformation.
///
/// The fact lookups default to "unknown" so test doubles only need
/// [`SignalExtractor::extract`].
pub trait SignalExtractor: Send + Sync {
    /// Extract ingredient and allergen candidates from `text`.
    fn extract(&self, text: &str) -> ExtractionResult;

    fn ingredient_facts(&self, _name: &str) -> Option<IngredientFacts> {
        None
    }

    fn allergen_facts(&self, _name: &str) -> Option<AllergenFacts> {
        None
    }
}
