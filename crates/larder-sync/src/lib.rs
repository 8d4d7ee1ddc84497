//! # larder-sync
//!
//! Reconciliation between a remote catalog and the local kitchen store.
//!
//! - [`CatalogTransformer`]: remote catalog objects → drafts + pending mappings
//! - [`ImportOrchestrator`]: drafts → local records, allergens then
//!   ingredients then menu items, never creating a duplicate
//! - [`SyncValidator`]: structural checks, duplicate groups, reference and
//!   naming-conflict reports
//!
//! No network access happens here; the provider client lives in `larder-pos`.

mod error;
mod import;
mod local;
mod transform;
mod validate;

pub use error::SyncError;
pub use import::{
    EntityStats, ImportOrchestrator, ImportReport, ImportStats, MenuItemOutcome, MenuItemPlan,
    PlanAction,
};
pub use local::{LocalIndex, Resolution};
pub use transform::{CatalogTransform, CatalogTransformer};
pub use validate::{SyncValidator, ValidationOptions};
