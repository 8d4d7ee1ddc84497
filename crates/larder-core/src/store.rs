//! The local entity store seam.
//!
//! The kitchen application owns persistence. Reconciliation only needs to
//! list existing records, create missing ones and record sync mappings, so
//! that is all [`LocalStore`] exposes. [`MemoryStore`] backs tests and the
//! CLI's JSON snapshot file.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Allergen, Ingredient, MenuItem, SyncMapping};
use crate::enums::{EntityStatus, Severity};
use crate::errors::StoreError;
use crate::ids;

/// Fields needed to create an allergen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAllergen {
    pub name: String,
    pub category: String,
    pub severity: Severity,
    pub is_custom: bool,
}

/// Fields needed to create an ingredient. `allergen_ids` are already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub expiry_days_hint: u32,
    pub allergen_ids: Vec<String>,
}

/// Fields needed to create a menu item. `ingredient_ids` are already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuItem {
    pub name: String,
    pub ingredient_ids: Vec<String>,
}

/// Read/write access to the local kitchen store.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn list_allergens(&self) -> Result<Vec<Allergen>, StoreError>;
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, StoreError>;
    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, StoreError>;
    async fn list_mappings(&self) -> Result<Vec<SyncMapping>, StoreError>;

    async fn create_allergen(&self, new: NewAllergen) -> Result<Allergen, StoreError>;
    async fn create_ingredient(&self, new: NewIngredient) -> Result<Ingredient, StoreError>;
    async fn create_menu_item(&self, new: NewMenuItem) -> Result<MenuItem, StoreError>;

    /// Insert or replace the mapping for `mapping.external_id`.
    async fn upsert_mapping(&self, mapping: SyncMapping) -> Result<(), StoreError>;
}

/// Serializable contents of a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default)]
    pub mappings: Vec<SyncMapping>,
}

/// In-process store guarded by a mutex.
///
/// Rejects a create whose name equals an existing record's name ignoring
/// ASCII case and surrounding whitespace, and any reference to an unknown ID.
/// Fuzzy duplicate prevention is the caller's job.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreSnapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// Copy of the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreSnapshot>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn require_name(entity_type: &str, name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Rejected {
            entity_type: entity_type.into(),
            reason: "name is empty".into(),
        });
    }
    Ok(())
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn list_allergens(&self) -> Result<Vec<Allergen>, StoreError> {
        Ok(self.lock()?.allergens.clone())
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, StoreError> {
        Ok(self.lock()?.ingredients.clone())
    }

    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.lock()?.menu_items.clone())
    }

    async fn list_mappings(&self) -> Result<Vec<SyncMapping>, StoreError> {
        Ok(self.lock()?.mappings.clone())
    }

    async fn create_allergen(&self, new: NewAllergen) -> Result<Allergen, StoreError> {
        require_name("allergen", &new.name)?;
        let mut state = self.lock()?;
        if state.allergens.iter().any(|a| same_name(&a.name, &new.name)) {
            return Err(StoreError::Duplicate {
                entity_type: "allergen".into(),
                name: new.name,
            });
        }
        let allergen = Allergen {
            id: ids::generate_id(ids::PREFIX_ALLERGEN)?,
            name: new.name.trim().to_string(),
            category: new.category,
            severity: new.severity,
            status: EntityStatus::Active,
            is_custom: new.is_custom,
        };
        state.allergens.push(allergen.clone());
        tracing::debug!(id = %allergen.id, name = %allergen.name, "store: created allergen");
        Ok(allergen)
    }

    async fn create_ingredient(&self, new: NewIngredient) -> Result<Ingredient, StoreError> {
        require_name("ingredient", &new.name)?;
        let mut state = self.lock()?;
        if state.ingredients.iter().any(|i| same_name(&i.name, &new.name)) {
            return Err(StoreError::Duplicate {
                entity_type: "ingredient".into(),
                name: new.name,
            });
        }
        if let Some(missing) = new
            .allergen_ids
            .iter()
            .find(|id| !state.allergens.iter().any(|a| &a.id == *id))
        {
            return Err(StoreError::MissingReference {
                entity_type: "allergen".into(),
                id: missing.clone(),
            });
        }
        let ingredient = Ingredient {
            id: ids::generate_id(ids::PREFIX_INGREDIENT)?,
            name: new.name.trim().to_string(),
            expiry_days_hint: new.expiry_days_hint,
            allergen_ids: new.allergen_ids,
        };
        state.ingredients.push(ingredient.clone());
        tracing::debug!(id = %ingredient.id, name = %ingredient.name, "store: created ingredient");
        Ok(ingredient)
    }

    async fn create_menu_item(&self, new: NewMenuItem) -> Result<MenuItem, StoreError> {
        require_name("menu_item", &new.name)?;
        let mut state = self.lock()?;
        if state.menu_items.iter().any(|m| same_name(&m.name, &new.name)) {
            return Err(StoreError::Duplicate {
                entity_type: "menu_item".into(),
                name: new.name,
            });
        }
        if let Some(missing) = new
            .ingredient_ids
            .iter()
            .find(|id| !state.ingredients.iter().any(|i| &i.id == *id))
        {
            return Err(StoreError::MissingReference {
                entity_type: "ingredient".into(),
                id: missing.clone(),
            });
        }
        let item = MenuItem {
            id: ids::generate_id(ids::PREFIX_MENU_ITEM)?,
            name: new.name.trim().to_string(),
            ingredient_ids: new.ingredient_ids,
            status: EntityStatus::Active,
        };
        state.menu_items.push(item.clone());
        tracing::debug!(id = %item.id, name = %item.name, "store: created menu item");
        Ok(item)
    }

    async fn upsert_mapping(&self, mapping: SyncMapping) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        match state
            .mappings
            .iter_mut()
            .find(|m| m.external_id == mapping.external_id)
        {
            Some(existing) => *existing = mapping,
            None => state.mappings.push(mapping),
        }
        Ok(())
    }
}
