use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SyncStatus;

/// Join record linking one external catalog item to at most one local entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SyncMapping {
    pub external_id: String,
    pub local_id: Option<String>,
    pub sync_status: SyncStatus,
    pub owner_id: String,
    /// Description seen at transform time, kept for audit.
    #[serde(default)]
    pub source_description: String,
    /// Category name seen at transform time, kept for audit.
    pub source_category: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SyncMapping {
    /// A fresh pending mapping with no local record yet.
    #[must_use]
    pub fn pending(external_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            local_id: None,
            sync_status: SyncStatus::Pending,
            owner_id: owner_id.into(),
            source_description: String::new(),
            source_category: None,
            updated_at: Utc::now(),
        }
    }

    /// Mark synced against `local_id`.
    #[must_use]
    pub fn synced(mut self, local_id: impl Into<String>) -> Self {
        self.local_id = Some(local_id.into());
        self.sync_status = SyncStatus::Synced;
        self.updated_at = Utc::now();
        self
    }

    #[must_use]
    pub fn failed(mut self) -> Self {
        self.sync_status = SyncStatus::Failed;
        self.updated_at = Utc::now();
        self
    }
}
