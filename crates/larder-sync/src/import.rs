//! Dependency-ordered import of drafts into the local store.
//!
//! Allergens first, then ingredients (which reference allergen ids), then
//! menu items (which reference ingredient ids). Every draft ends in exactly
//! one of created / existing / skipped / failed, so per-type stats always
//! sum to the number of drafts. One failing record never aborts the batch.

use std::collections::HashMap;
use std::sync::Arc;

use larder_core::drafts::{AllergenDraft, IngredientDraft, MenuItemDraft};
use larder_core::entities::MenuItem;
use larder_core::errors::StoreError;
use larder_core::store::{LocalStore, NewAllergen, NewIngredient, NewMenuItem};
use larder_resolve::resolve_with_tier;
use serde::Serialize;

use crate::SyncError;
use crate::local::LocalIndex;

/// Outcome counts for one entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityStats {
    pub created: usize,
    pub existing: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl EntityStats {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.existing + self.skipped + self.failed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub allergens: EntityStats,
    pub ingredients: EntityStats,
    pub menu_items: EntityStats,
}

/// Summary of one import: counts, human-readable warnings, created menu items.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub stats: ImportStats,
    pub warnings: Vec<String>,
    pub created_menu_items: Vec<MenuItem>,
}

impl ImportReport {
    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    /// Record the creation results for planned menu items and count every
    /// plan exactly once.
    ///
    /// `results` pairs a draft index with the store's answer and may arrive
    /// in any order. Returns one outcome per plan, in plan order.
    pub fn settle_menu_items(
        &mut self,
        plans: &[MenuItemPlan],
        results: Vec<(usize, Result<MenuItem, StoreError>)>,
    ) -> Vec<MenuItemOutcome> {
        let mut results: HashMap<usize, Result<MenuItem, StoreError>> =
            results.into_iter().collect();
        let mut outcomes: Vec<MenuItemOutcome> = Vec::with_capacity(plans.len());
        let mut by_index: HashMap<usize, usize> = HashMap::new();

        for plan in plans {
            let outcome = match &plan.action {
                PlanAction::Create(_) => match results.remove(&plan.index) {
                    Some(Ok(item)) => {
                        self.stats.menu_items.created += 1;
                        let local_id = item.id.clone();
                        self.created_menu_items.push(item);
                        MenuItemOutcome::Created { local_id }
                    }
                    Some(Err(err)) => {
                        self.stats.menu_items.failed += 1;
                        let reason = err.to_string();
                        self.warn(format!("Failed to create menu item '{}': {reason}", plan.name));
                        MenuItemOutcome::Failed { reason }
                    }
                    None => {
                        self.stats.menu_items.failed += 1;
                        let reason = "creation did not complete".to_string();
                        self.warn(format!("Failed to create menu item '{}': {reason}", plan.name));
                        MenuItemOutcome::Failed { reason }
                    }
                },
                PlanAction::Existing { local_id } => {
                    self.stats.menu_items.existing += 1;
                    MenuItemOutcome::Existing {
                        local_id: local_id.clone(),
                    }
                }
                PlanAction::SameAs { index } => {
                    let earlier = by_index
                        .get(index)
                        .and_then(|&position| outcomes[position].local_id());
                    if let Some(local_id) = earlier {
                        self.stats.menu_items.existing += 1;
                        MenuItemOutcome::Existing {
                            local_id: local_id.to_string(),
                        }
                    } else {
                        self.stats.menu_items.failed += 1;
                        let reason = format!("duplicate of draft {index}, which was not created");
                        self.warn(format!("Menu item '{}' not created: {reason}", plan.name));
                        MenuItemOutcome::Failed { reason }
                    }
                }
                PlanAction::Skipped { .. } => {
                    self.stats.menu_items.skipped += 1;
                    MenuItemOutcome::Skipped
                }
            };
            by_index.insert(plan.index, outcomes.len());
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// What to do with one menu-item draft, decided before any creation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemPlan {
    /// Position of the draft in the input list.
    pub index: usize,
    pub external_id: Option<String>,
    pub name: String,
    pub action: PlanAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Every ingredient resolved; create with these ids.
    Create(NewMenuItem),
    /// Already in the local store, by mapping or by name.
    Existing { local_id: String },
    /// Resolves to an earlier draft in this batch that is being created.
    SameAs { index: usize },
    /// At least one ingredient could not be resolved, or the name is empty.
    Skipped { missing: Vec<String> },
}

/// Final state of one menu-item draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItemOutcome {
    Created { local_id: String },
    Existing { local_id: String },
    Skipped,
    Failed { reason: String },
}

impl MenuItemOutcome {
    #[must_use]
    pub fn local_id(&self) -> Option<&str> {
        match self {
            Self::Created { local_id } | Self::Existing { local_id } => Some(local_id),
            Self::Skipped | Self::Failed { .. } => None,
        }
    }
}

/// Reconciles drafts against a [`LocalStore`], create-only.
#[derive(Clone)]
pub struct ImportOrchestrator {
    store: Arc<dyn LocalStore>,
}

impl std::fmt::Debug for ImportOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportOrchestrator").finish_non_exhaustive()
    }
}

impl ImportOrchestrator {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn LocalStore> {
        &self.store
    }

    /// Load every local allergen, ingredient, menu item and sync mapping and
    /// index them.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Preload`] if the store cannot be listed.
    pub async fn load_index(&self) -> Result<LocalIndex, SyncError> {
        let allergens = self
            .store
            .list_allergens()
            .await
            .map_err(SyncError::preload("allergen"))?;
        let ingredients = self
            .store
            .list_ingredients()
            .await
            .map_err(SyncError::preload("ingredient"))?;
        let menu_items = self
            .store
            .list_menu_items()
            .await
            .map_err(SyncError::preload("menu item"))?;
        let mappings = self
            .store
            .list_mappings()
            .await
            .map_err(SyncError::preload("mapping"))?;
        tracing::debug!(
            allergens = allergens.len(),
            ingredients = ingredients.len(),
            menu_items = menu_items.len(),
            mappings = mappings.len(),
            "loaded local records"
        );
        Ok(LocalIndex::from_records(allergens, ingredients, menu_items).with_mappings(&mappings))
    }

    /// Import a batch of drafts in dependency order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Preload`] if the local store cannot be read up
    /// front. Failures on individual records are reported as warnings.
    pub async fn process_import(
        &self,
        allergens: &[AllergenDraft],
        ingredients: &[IngredientDraft],
        menu_items: &[MenuItemDraft],
    ) -> Result<ImportReport, SyncError> {
        let mut report = ImportReport::default();
        let mut index = self.load_index().await?;

        self.reconcile_allergens(&mut index, allergens, &mut report)
            .await;
        self.reconcile_ingredients(&mut index, ingredients, &mut report)
            .await;

        let plans = Self::plan_menu_items(&index, menu_items, &mut report);
        let mut results = Vec::new();
        for plan in &plans {
            if let PlanAction::Create(new) = &plan.action {
                results.push((plan.index, self.store.create_menu_item(new.clone()).await));
            }
        }
        report.settle_menu_items(&plans, results);

        tracing::debug!(
            allergens = ?report.stats.allergens,
            ingredients = ?report.stats.ingredients,
            menu_items = ?report.stats.menu_items,
            warnings = report.warnings.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Resolve or create each allergen draft, in order.
    pub async fn reconcile_allergens(
        &self,
        index: &mut LocalIndex,
        drafts: &[AllergenDraft],
        report: &mut ImportReport,
    ) {
        for draft in drafts {
            let name = draft.name.trim();
            if name.is_empty() {
                report.stats.allergens.skipped += 1;
                report.warn("Skipped allergen draft with an empty name".to_string());
                continue;
            }
            if index.allergen(name).is_some() {
                report.stats.allergens.existing += 1;
                continue;
            }

            let new = NewAllergen {
                name: name.to_string(),
                category: draft.category.clone(),
                severity: draft.severity,
                is_custom: true,
            };
            match self.store.create_allergen(new).await {
                Ok(created) => {
                    report.stats.allergens.created += 1;
                    index.insert_allergen(created);
                }
                Err(err) => {
                    report.stats.allergens.failed += 1;
                    report.warn(format!("Failed to create allergen '{name}': {err}"));
                }
            }
        }
        tracing::debug!(stats = ?report.stats.allergens, "reconciled allergens");
    }

    /// Resolve or create each ingredient draft, in order.
    ///
    /// Unresolvable allergen references are warned about and dropped; they
    /// never block the ingredient itself.
    pub async fn reconcile_ingredients(
        &self,
        index: &mut LocalIndex,
        drafts: &[IngredientDraft],
        report: &mut ImportReport,
    ) {
        for draft in drafts {
            let name = draft.name.trim();
            if name.is_empty() {
                report.stats.ingredients.skipped += 1;
                report.warn("Skipped ingredient draft with an empty name".to_string());
                continue;
            }

            if index.ingredient(name).is_some() {
                report.stats.ingredients.existing += 1;
                continue;
            }

            let mut allergen_ids: Vec<String> = Vec::new();
            for allergen in &draft.allergen_names {
                match index.allergen(allergen) {
                    Some(hit) if !allergen_ids.contains(&hit.id) => allergen_ids.push(hit.id),
                    Some(_) => {}
                    None => report.warn(format!(
                        "Ingredient '{name}': allergen '{allergen}' not found, reference dropped"
                    )),
                }
            }

            let new = NewIngredient {
                name: name.to_string(),
                expiry_days_hint: draft.effective_expiry_days(),
                allergen_ids,
            };
            match self.store.create_ingredient(new).await {
                Ok(created) => {
                    report.stats.ingredients.created += 1;
                    index.insert_ingredient(created);
                }
                Err(err) => {
                    report.stats.ingredients.failed += 1;
                    report.warn(format!("Failed to create ingredient '{name}': {err}"));
                }
            }
        }
        tracing::debug!(stats = ?report.stats.ingredients, "reconciled ingredients");
    }

    /// Decide, without writing, what happens to each menu-item draft.
    ///
    /// A draft whose external id has a synced mapping to a live record is
    /// existing, whatever its current name. Otherwise the name is resolved
    /// against local menu items, then against drafts already planned for
    /// creation in this batch. A draft with any unresolved ingredient is
    /// skipped whole. Stats are
    /// counted later by [`ImportReport::settle_menu_items`]; only the skip
    /// warnings are recorded here.
    pub fn plan_menu_items(
        index: &LocalIndex,
        drafts: &[MenuItemDraft],
        report: &mut ImportReport,
    ) -> Vec<MenuItemPlan> {
        // (name, draft index) of every draft planned for creation so far.
        let mut planned: Vec<(String, usize)> = Vec::new();
        let mut plans = Vec::with_capacity(drafts.len());

        for (i, draft) in drafts.iter().enumerate() {
            let name = draft.name.trim();
            let linked = draft
                .external_id
                .as_deref()
                .and_then(|external_id| index.mapped_menu_item(external_id));
            let action = if let Some(hit) = linked {
                PlanAction::Existing { local_id: hit.id }
            } else if name.is_empty() {
                report.warn(format!("Skipped menu item draft {i} with an empty name"));
                PlanAction::Skipped {
                    missing: Vec::new(),
                }
            } else if let Some(hit) = index.menu_item(name) {
                PlanAction::Existing { local_id: hit.id }
            } else if let Some(((earlier, first), tier)) =
                resolve_with_tier(name, &planned, |(planned_name, _)| planned_name.as_str())
            {
                tracing::debug!(draft = name, earlier = %earlier, %tier, "same as earlier draft");
                PlanAction::SameAs { index: *first }
            } else {
                let mut ingredient_ids: Vec<String> = Vec::new();
                let mut missing = Vec::new();
                for ingredient in &draft.ingredient_names {
                    match index.ingredient(ingredient) {
                        Some(hit) if !ingredient_ids.contains(&hit.id) => {
                            ingredient_ids.push(hit.id);
                        }
                        Some(_) => {}
                        None => missing.push(ingredient.clone()),
                    }
                }

                if missing.is_empty() {
                    planned.push((name.to_string(), i));
                    PlanAction::Create(NewMenuItem {
                        name: name.to_string(),
                        ingredient_ids,
                    })
                } else {
                    report.warn(format!(
                        "Skipped menu item '{name}': unresolved ingredients: {}",
                        missing.join(", ")
                    ));
                    PlanAction::Skipped { missing }
                }
            };

            plans.push(MenuItemPlan {
                index: i,
                external_id: draft.external_id.clone(),
                name: name.to_string(),
                action,
            });
        }

        tracing::debug!(
            drafts = drafts.len(),
            to_create = plans
                .iter()
                .filter(|p| matches!(p.action, PlanAction::Create(_)))
                .count(),
            "planned menu items"
        );
        plans
    }
}
