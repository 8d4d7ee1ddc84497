//! One full catalog-to-local reconciliation run.

use std::sync::Arc;
use std::time::Instant;

use larder_core::entities::MenuItem;
use larder_core::errors::StoreError;
use larder_core::store::LocalStore;
use larder_extract::TextSignalExtractor;
use larder_sync::{
    CatalogTransformer, ImportOrchestrator, ImportReport, MenuItemOutcome, MenuItemPlan,
    PlanAction,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::PosClient;
use crate::error::PosError;

/// Summary of a sync run.
///
/// `items_failed` counts menu items that were skipped for unresolved
/// ingredients as well as those whose creation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    pub items_processed: usize,
    pub items_created: usize,
    pub items_existing: usize,
    pub items_failed: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl PosClient {
    /// Fetch the remote catalog and reconcile it into `store`.
    ///
    /// Allergens and ingredients are reconciled in order; menu items are
    /// then created concurrently, at most `sync.max_concurrency` at a time,
    /// against an index that no longer changes. One item failing never
    /// stops the others. Each item's mapping is recorded as synced or
    /// failed; a mapping that is already synced is never marked failed.
    ///
    /// # Errors
    ///
    /// Only setup failures are errors: fetching the catalog, or reading the
    /// local store before any item is processed.
    pub async fn sync_catalog_to_local(
        &self,
        store: Arc<dyn LocalStore>,
        owner_id: &str,
    ) -> Result<SyncResult, PosError> {
        let started = Instant::now();

        let objects = self.get_catalog_items().await?;
        let transform =
            CatalogTransformer::new(TextSignalExtractor::new()).transform(&objects, owner_id);

        let orchestrator = ImportOrchestrator::new(Arc::clone(&store));
        let mut report = ImportReport::default();
        let mut index = orchestrator.load_index().await?;
        orchestrator
            .reconcile_allergens(&mut index, &transform.allergens, &mut report)
            .await;
        orchestrator
            .reconcile_ingredients(&mut index, &transform.ingredients, &mut report)
            .await;

        let plans = ImportOrchestrator::plan_menu_items(&index, &transform.menu_items, &mut report);
        let results = create_menu_items(&store, &plans, self.max_concurrency).await;
        let outcomes = report.settle_menu_items(&plans, results);

        let mut errors = Vec::new();
        for (plan, outcome) in plans.iter().zip(&outcomes) {
            match (outcome, &plan.action) {
                (MenuItemOutcome::Failed { reason }, _) => {
                    errors.push(format!("{}: {reason}", plan.name));
                }
                (MenuItemOutcome::Skipped, PlanAction::Skipped { missing })
                    if !missing.is_empty() =>
                {
                    errors.push(format!(
                        "{}: unresolved ingredients: {}",
                        plan.name,
                        missing.join(", ")
                    ));
                }
                (MenuItemOutcome::Skipped, _) => {
                    errors.push(format!("{}: skipped", plan.name));
                }
                _ => {}
            }
        }

        // Menu-item drafts and mappings are produced in the same order.
        let mut warnings = std::mem::take(&mut report.warnings);
        for (mapping, outcome) in transform.mappings.into_iter().zip(&outcomes) {
            let external_id = mapping.external_id.clone();
            let mapping = match (outcome.local_id(), index.mapped_local_id(&external_id)) {
                (Some(local_id), _) => mapping.synced(local_id),
                (None, Some(linked)) => {
                    warnings.push(format!(
                        "'{external_id}' stays linked to {linked} although this run failed"
                    ));
                    continue;
                }
                (None, None) => mapping.failed(),
            };
            if let Err(err) = store.upsert_mapping(mapping).await {
                let message = format!("Failed to record mapping for '{external_id}': {err}");
                tracing::warn!("{message}");
                warnings.push(message);
            }
        }

        let stats = &report.stats.menu_items;
        let items_failed = stats.failed + stats.skipped;
        let result = SyncResult {
            success: items_failed == 0,
            items_processed: outcomes.len(),
            items_created: stats.created,
            items_existing: stats.existing,
            items_failed,
            errors,
            warnings,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        tracing::debug!(
            owner_id,
            processed = result.items_processed,
            created = result.items_created,
            existing = result.items_existing,
            failed = result.items_failed,
            duration_ms = result.duration_ms,
            "catalog sync finished"
        );
        Ok(result)
    }
}

/// Create every `PlanAction::Create` concurrently, at most `limit` in flight.
///
/// Results arrive in completion order. A task that panics is logged and
/// leaves its index without a result.
async fn create_menu_items(
    store: &Arc<dyn LocalStore>,
    plans: &[MenuItemPlan],
    limit: usize,
) -> Vec<(usize, Result<MenuItem, StoreError>)> {
    let permits = Arc::new(Semaphore::new(limit.max(1)));
    let mut set = JoinSet::new();

    for plan in plans {
        let PlanAction::Create(new) = &plan.action else {
            continue;
        };
        let store = Arc::clone(store);
        let permits = Arc::clone(&permits);
        let index = plan.index;
        let new = new.clone();
        set.spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            (index, store.create_menu_item(new).await)
        });
    }

    let mut results = Vec::with_capacity(set.len());
    while let Some(res) = set.join_next().await {
        match res {
            Ok(result) => results.push(result),
            Err(e) => tracing::warn!(%e, "menu item creation task failed"),
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use larder_core::entities::{Allergen, Ingredient, SyncMapping};
    use larder_core::store::{MemoryStore, NewAllergen, NewIngredient, NewMenuItem};

    use super::*;

    /// Counts how many menu-item creates run at once.
    struct GatedStore {
        inner: MemoryStore,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl LocalStore for GatedStore {
        async fn list_allergens(&self) -> Result<Vec<Allergen>, StoreError> {
            self.inner.list_allergens().await
        }
        async fn list_ingredients(&self) -> Result<Vec<Ingredient>, StoreError> {
            self.inner.list_ingredients().await
        }
        async fn list_menu_items(&self) -> Result<Vec<MenuItem>, StoreError> {
            self.inner.list_menu_items().await
        }
        async fn list_mappings(&self) -> Result<Vec<SyncMapping>, StoreError> {
            self.inner.list_mappings().await
        }
        async fn create_allergen(&self, new: NewAllergen) -> Result<Allergen, StoreError> {
            self.inner.create_allergen(new).await
        }
        async fn create_ingredient(&self, new: NewIngredient) -> Result<Ingredient, StoreError> {
            self.inner.create_ingredient(new).await
        }
        async fn create_menu_item(&self, new: NewMenuItem) -> Result<MenuItem, StoreError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            let result = self.inner.create_menu_item(new).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
        async fn upsert_mapping(&self, mapping: SyncMapping) -> Result<(), StoreError> {
            self.inner.upsert_mapping(mapping).await
        }
    }

    fn plan(index: usize, name: &str) -> MenuItemPlan {
        MenuItemPlan {
            index,
            external_id: None,
            name: name.into(),
            action: PlanAction::Create(NewMenuItem {
                name: name.into(),
                ingredient_ids: Vec::new(),
            }),
        }
    }

    #[tokio::test]
    async fn creation_respects_concurrency_cap() {
        let gated = Arc::new(GatedStore {
            inner: MemoryStore::new(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let store: Arc<dyn LocalStore> = gated.clone();
        let plans: Vec<_> = (0..8).map(|i| plan(i, &format!("Dish {i}"))).collect();

        let results = create_menu_items(&store, &plans, 2).await;

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert!(gated.peak.load(Ordering::SeqCst) <= 2);
        assert!(gated.peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_siblings() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        // Same name twice: the store rejects whichever lands second.
        let plans = vec![plan(0, "Soup"), plan(1, "soup"), plan(2, "Salad")];

        let mut results = create_menu_items(&store, &plans, 3).await;
        results.sort_by_key(|(i, _)| *i);

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|(_, r)| r.is_err()).count(), 1);
        assert!(results[2].1.is_ok());
    }

    #[tokio::test]
    async fn non_create_plans_are_not_sent() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        let plans = vec![MenuItemPlan {
            index: 0,
            external_id: None,
            name: "Tea".into(),
            action: PlanAction::Existing {
                local_id: "mnu-1".into(),
            },
        }];
        assert!(create_menu_items(&store, &plans, 4).await.is_empty());
    }
}
