//! Catalog sync tuning.

use serde::{Deserialize, Serialize};

/// Cap on concurrent menu-item create calls during a sync run.
const fn default_max_concurrency() -> usize {
    4
}

/// Lifetime of an issued OAuth state value.
const fn default_state_ttl_secs() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,

    /// Restrict catalog and inventory reads to these locations. Empty means all.
    #[serde(default)]
    pub location_ids: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            state_ttl_secs: default_state_ttl_secs(),
            location_ids: Vec::new(),
        }
    }
}

impl SyncConfig {
    /// Concurrency cap, never below 1.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}
