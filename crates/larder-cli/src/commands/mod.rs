pub mod auth;
pub mod catalog;
pub mod dispatch;
pub mod extract;
pub mod import;
pub mod schema;
pub mod sync;
pub mod validate;
pub mod webhooks;

use std::fs;

use anyhow::Context;
use larder_core::drafts::DraftBatch;

/// Read a draft batch JSON file.
pub(crate) fn read_batch(path: &str) -> anyhow::Result<DraftBatch> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("{path} is not a valid draft batch"))
}
