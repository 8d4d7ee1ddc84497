//! Turns a remote catalog into local drafts.
//!
//! Only `Item` objects become menu items. Categories provide the category
//! name recorded on the audit mapping; variations are carried by the catalog
//! but contribute nothing to extraction.

use std::collections::{HashMap, HashSet};

use larder_core::drafts::{AllergenDraft, DraftBatch, IngredientDraft, MenuItemDraft};
use larder_core::entities::{ExternalCatalogItem, SyncMapping};
use larder_core::enums::CatalogObjectKind;
use larder_extract::SignalExtractor;
use larder_resolve::normalize;

/// Attribute keys containing one of these are re-scanned as ingredient lists.
const INGREDIENT_ATTRIBUTE_MARKERS: &[&str] = &["ingredient", "contains"];

/// Output of [`CatalogTransformer::transform`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTransform {
    pub owner_id: String,
    pub menu_items: Vec<MenuItemDraft>,
    pub ingredients: Vec<IngredientDraft>,
    pub allergens: Vec<AllergenDraft>,
    /// One pending mapping per transformed item, in item order.
    pub mappings: Vec<SyncMapping>,
}

impl CatalogTransform {
    /// The drafts without the mappings, as consumed by import and validation.
    #[must_use]
    pub fn batch(&self) -> DraftBatch {
        DraftBatch {
            allergens: self.allergens.clone(),
            ingredients: self.ingredients.clone(),
            menu_items: self.menu_items.clone(),
        }
    }
}

/// Signals gathered for one catalog item across its description and attributes.
#[derive(Debug, Default)]
struct ItemSignals {
    ingredient_names: Vec<String>,
    allergen_names: Vec<String>,
    confidence: f64,
}

/// Builds drafts from remote catalog objects using an injected extractor.
#[derive(Debug, Clone)]
pub struct CatalogTransformer<E> {
    extractor: E,
}

impl<E: SignalExtractor> CatalogTransformer<E> {
    pub const fn new(extractor: E) -> Self {
        Self { extractor }
    }

    pub const fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Transform `items` into deduplicated drafts plus one pending mapping
    /// per `Item` object. Pure: no store or network access.
    pub fn transform(&self, items: &[ExternalCatalogItem], owner_id: &str) -> CatalogTransform {
        let categories: HashMap<&str, &str> = items
            .iter()
            .filter(|object| object.kind == CatalogObjectKind::Category)
            .map(|object| (object.id.as_str(), object.name.as_str()))
            .collect();

        let mut out = CatalogTransform {
            owner_id: owner_id.to_string(),
            ..CatalogTransform::default()
        };

        // Pass 1: every ingredient and allergen mentioned anywhere.
        let mut seen_ingredients = HashSet::new();
        let mut seen_allergens = HashSet::new();
        for item in items.iter().filter(|object| object.is_item()) {
            let signals = self.signals_for(item);
            for name in &signals.ingredient_names {
                self.add_ingredient(&mut out, &mut seen_ingredients, &mut seen_allergens, name);
            }
            for name in &signals.allergen_names {
                self.add_allergen(&mut out, &mut seen_allergens, name);
            }
        }

        // Pass 2: one menu item draft and one mapping per item.
        for item in items.iter().filter(|object| object.is_item()) {
            let signals = self.signals_for(item);
            let category = item
                .category_ref
                .as_deref()
                .and_then(|id| categories.get(id))
                .map(ToString::to_string);
            if item.category_ref.is_some() && category.is_none() {
                tracing::debug!(item = %item.id, "category not present in catalog page");
            }

            out.menu_items.push(MenuItemDraft {
                external_id: Some(item.id.clone()),
                name: item.name.trim().to_string(),
                description: item.description.clone(),
                category: category.clone(),
                ingredient_names: signals.ingredient_names,
                allergen_names: signals.allergen_names,
                confidence: signals.confidence,
            });

            let mut mapping = SyncMapping::pending(&item.id, owner_id);
            mapping.source_description.clone_from(&item.description);
            mapping.source_category = category;
            out.mappings.push(mapping);
        }

        tracing::debug!(
            objects = items.len(),
            menu_items = out.menu_items.len(),
            ingredients = out.ingredients.len(),
            allergens = out.allergens.len(),
            "transformed catalog"
        );
        out
    }

    fn signals_for(&self, item: &ExternalCatalogItem) -> ItemSignals {
        let mut signals = ItemSignals::default();
        let mut texts = vec![item.description.clone()];
        for (key, value) in item.string_attributes() {
            texts.push(value.to_string());
            let key = key.to_lowercase();
            if INGREDIENT_ATTRIBUTE_MARKERS.iter().any(|m| key.contains(m)) {
                texts.push(format!("ingredients: {value}"));
            }
        }

        for text in &texts {
            let result = self.extractor.extract(text);
            signals.confidence = signals.confidence.max(result.confidence);
            extend_unique(&mut signals.ingredient_names, result.ingredient_names);
            extend_unique(&mut signals.allergen_names, result.allergen_names);
        }
        signals
    }

    fn add_ingredient(
        &self,
        out: &mut CatalogTransform,
        seen: &mut HashSet<String>,
        seen_allergens: &mut HashSet<String>,
        name: &str,
    ) {
        let key = normalize(name);
        if key.is_empty() || !seen.insert(key) {
            return;
        }

        let mut draft = IngredientDraft::named(name);
        if let Some(facts) = self.extractor.ingredient_facts(name) {
            draft.category = facts.category;
            draft.allergen_names = facts.allergens;
        }
        for allergen in &draft.allergen_names {
            self.add_allergen(out, seen_allergens, allergen);
        }

        out.ingredients.push(draft);
    }

    fn add_allergen(
        &self,
        out: &mut CatalogTransform,
        seen: &mut HashSet<String>,
        name: &str,
    ) {
        let key = normalize(name);
        if key.is_empty() || !seen.insert(key) {
            return;
        }

        let mut draft = AllergenDraft::named(name);
        if let Some(facts) = self.extractor.allergen_facts(name) {
            draft.category = facts.category;
            draft.severity = facts.severity;
        }

        out.allergens.push(draft);
    }
}

fn extend_unique(target: &mut Vec<String>, names: Vec<String>) {
    for name in names {
        let key = normalize(&name);
        if !target.iter().any(|existing| normalize(existing) == key) {
            target.push(name);
        }
    }
}
