//! Local records plus their name indices, loaded once per reconciliation run.

use std::collections::HashMap;

use larder_core::entities::{Allergen, Ingredient, MenuItem, SyncMapping};
use larder_core::enums::SyncStatus;
use larder_core::results::EntityKind;
use larder_resolve::{MatchTier, NameIndex, resolve_with_tier};

/// An existing local record that a draft name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub id: String,
    pub name: String,
    pub tier: MatchTier,
}

/// Snapshot of the local store used for resolution.
///
/// Allergen and ingredient passes insert what they create so that later
/// drafts in the same pass resolve to it. Menu-item planning only reads.
#[derive(Debug, Clone, Default)]
pub struct LocalIndex {
    allergens: Vec<Allergen>,
    allergen_names: NameIndex,
    ingredients: Vec<Ingredient>,
    ingredient_names: NameIndex,
    menu_items: Vec<MenuItem>,
    menu_item_names: NameIndex,
    /// External id to local menu-item id, from synced mappings only.
    synced: HashMap<String, String>,
}

impl LocalIndex {
    #[must_use]
    pub fn from_records(
        allergens: Vec<Allergen>,
        ingredients: Vec<Ingredient>,
        menu_items: Vec<MenuItem>,
    ) -> Self {
        let allergen_names =
            NameIndex::from_records(allergens.iter().map(|a| (a.name.as_str(), a.id.as_str())));
        let ingredient_names =
            NameIndex::from_records(ingredients.iter().map(|i| (i.name.as_str(), i.id.as_str())));
        let menu_item_names =
            NameIndex::from_records(menu_items.iter().map(|m| (m.name.as_str(), m.id.as_str())));
        Self {
            allergens,
            allergen_names,
            ingredients,
            ingredient_names,
            menu_items,
            menu_item_names,
            synced: HashMap::new(),
        }
    }

    /// Remember which external items are already linked to a local record.
    /// Pending and failed mappings are ignored.
    #[must_use]
    pub fn with_mappings(mut self, mappings: &[SyncMapping]) -> Self {
        self.synced = mappings
            .iter()
            .filter(|m| m.sync_status == SyncStatus::Synced)
            .filter_map(|m| Some((m.external_id.clone(), m.local_id.clone()?)))
            .collect();
        self
    }

    /// Local id a synced mapping records for `external_id`, whether or not
    /// the record still exists.
    #[must_use]
    pub fn mapped_local_id(&self, external_id: &str) -> Option<&str> {
        self.synced.get(external_id).map(String::as_str)
    }

    /// The local menu item a synced mapping links `external_id` to, if that
    /// record is still present.
    #[must_use]
    pub fn mapped_menu_item(&self, external_id: &str) -> Option<Resolution> {
        let local_id = self.mapped_local_id(external_id)?;
        let item = self.menu_items.iter().find(|m| m.id == local_id)?;
        Some(Resolution {
            id: item.id.clone(),
            name: item.name.clone(),
            tier: MatchTier::Exact,
        })
    }

    #[must_use]
    pub fn allergen(&self, name: &str) -> Option<Resolution> {
        lookup(
            EntityKind::Allergen,
            name,
            &self.allergen_names,
            &self.allergens,
            allergen_name,
            allergen_id,
        )
    }

    #[must_use]
    pub fn ingredient(&self, name: &str) -> Option<Resolution> {
        lookup(
            EntityKind::Ingredient,
            name,
            &self.ingredient_names,
            &self.ingredients,
            ingredient_name,
            ingredient_id,
        )
    }

    #[must_use]
    pub fn menu_item(&self, name: &str) -> Option<Resolution> {
        lookup(
            EntityKind::MenuItem,
            name,
            &self.menu_item_names,
            &self.menu_items,
            menu_item_name,
            menu_item_id,
        )
    }

    pub fn insert_allergen(&mut self, allergen: Allergen) {
        self.allergen_names.insert(&allergen.name, &allergen.id);
        self.allergens.push(allergen);
    }

    pub fn insert_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredient_names.insert(&ingredient.name, &ingredient.id);
        self.ingredients.push(ingredient);
    }

    #[must_use]
    pub fn allergens(&self) -> &[Allergen] {
        &self.allergens
    }

    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    #[must_use]
    pub fn menu_items(&self) -> &[MenuItem] {
        &self.menu_items
    }
}

fn allergen_name(a: &Allergen) -> &str {
    &a.name
}

fn allergen_id(a: &Allergen) -> &str {
    &a.id
}

fn ingredient_name(i: &Ingredient) -> &str {
    &i.name
}

fn ingredient_id(i: &Ingredient) -> &str {
    &i.id
}

fn menu_item_name(m: &MenuItem) -> &str {
    &m.name
}

fn menu_item_id(m: &MenuItem) -> &str {
    &m.id
}

/// Index lookup first, then the tiered resolver over the full record list.
fn lookup<T>(
    kind: EntityKind,
    name: &str,
    index: &NameIndex,
    records: &[T],
    name_of: fn(&T) -> &str,
    id_of: fn(&T) -> &str,
) -> Option<Resolution> {
    if let Some(id) = index.get(name) {
        let local_name = records
            .iter()
            .find(|record| id_of(record) == id)
            .map_or_else(|| name.to_string(), |record| name_of(record).to_string());
        return Some(Resolution {
            id: id.to_string(),
            name: local_name,
            tier: MatchTier::Exact,
        });
    }

    let (record, tier) = resolve_with_tier(name, records, name_of)?;
    tracing::debug!(
        %kind,
        candidate = name,
        matched = name_of(record),
        %tier,
        "resolved to existing record"
    );
    Some(Resolution {
        id: id_of(record).to_string(),
        name: name_of(record).to_string(),
        tier,
    })
}

#[cfg(test)]
mod tests {
    use larder_core::enums::{EntityStatus, Severity};
    use pretty_assertions::assert_eq;

    use super::*;

    fn allergen(id: &str, name: &str) -> Allergen {
        Allergen {
            id: id.into(),
            name: name.into(),
            category: "other".into(),
            severity: Severity::Medium,
            status: EntityStatus::Active,
            is_custom: false,
        }
    }

    #[test]
    fn index_hit_reports_local_spelling() {
        let index = LocalIndex::from_records(vec![allergen("alg-1", "Tree Nuts")], vec![], vec![]);
        let hit = index.allergen("tree nut").expect("normalized hit");
        assert_eq!(
            hit,
            Resolution {
                id: "alg-1".into(),
                name: "Tree Nuts".into(),
                tier: MatchTier::Exact,
            }
        );
    }

    #[test]
    fn falls_back_to_fuzzy_tiers() {
        let index = LocalIndex::from_records(vec![allergen("alg-1", "Shellfish")], vec![], vec![]);
        let hit = index.allergen("shellfis").expect("close containment");
        assert_eq!(hit.id, "alg-1");
        assert_eq!(hit.tier, MatchTier::CloseContainment);
        assert!(index.allergen("sesame").is_none());
    }

    #[test]
    fn only_synced_mappings_to_live_records_link() {
        let item = MenuItem {
            id: "mnu-1".into(),
            name: "Green Curry".into(),
            ingredient_ids: vec![],
            status: EntityStatus::Active,
        };
        let mappings = vec![
            SyncMapping::pending("ITEM_1", "o").synced("mnu-1"),
            SyncMapping::pending("ITEM_2", "o").synced("mnu-gone"),
            SyncMapping::pending("ITEM_3", "o").failed(),
        ];
        let index = LocalIndex::from_records(vec![], vec![], vec![item]).with_mappings(&mappings);

        let linked = index.mapped_menu_item("ITEM_1").expect("linked");
        assert_eq!(linked.name, "Green Curry");
        assert_eq!(index.mapped_local_id("ITEM_2"), Some("mnu-gone"));
        assert!(index.mapped_menu_item("ITEM_2").is_none());
        assert!(index.mapped_local_id("ITEM_3").is_none());
    }

    #[test]
    fn inserted_records_become_resolvable() {
        let mut index = LocalIndex::default();
        assert!(index.allergen("fish").is_none());
        index.insert_allergen(allergen("alg-2", "Fish"));
        assert_eq!(index.allergen("FISH").map(|r| r.id), Some("alg-2".to_string()));
        assert_eq!(index.allergens().len(), 1);
    }
}
