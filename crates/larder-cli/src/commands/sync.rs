use std::sync::Arc;

use larder_core::store::LocalStore;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `larder sync`.
///
/// Per-item failures are part of the printed result; only setup failures
/// make the command exit non-zero.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let owner_id = ctx.owner_id()?;
    let client = ctx.pos_client()?;
    let store: Arc<dyn LocalStore> = ctx.store.clone();

    let result = client.sync_catalog_to_local(store, owner_id).await?;
    ctx.store.save()?;

    if !result.success && !flags.quiet {
        tracing::warn!(failed = result.items_failed, "sync finished with failures");
    }
    output(&result, flags.format)
}
