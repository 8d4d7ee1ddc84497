//! The CLI's local store: a [`MemoryStore`] loaded from and saved to a JSON
//! snapshot file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use larder_core::entities::{Allergen, Ingredient, MenuItem, SyncMapping};
use larder_core::errors::StoreError;
use larder_core::store::{
    LocalStore, MemoryStore, NewAllergen, NewIngredient, NewMenuItem, StoreSnapshot,
};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Load `path`, or start empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let snapshot = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read store file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse store file {}", path.display()))?
        } else {
            StoreSnapshot::default()
        };
        Ok(Self {
            path,
            inner: MemoryStore::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> anyhow::Result<StoreSnapshot> {
        Ok(self.inner.snapshot()?)
    }

    /// Write the current contents back to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let snapshot = self.inner.snapshot()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write store file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "saved local store");
        Ok(())
    }
}

#[async_trait]
impl LocalStore for FileStore {
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
        self.inner.create_menu_item(new).await
    }

    async fn upsert_mapping(&self, mapping: SyncMapping) -> Result<(), StoreError> {
        self.inner.upsert_mapping(mapping).await
    }
}
