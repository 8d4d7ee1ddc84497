use larder_extract::TextSignalExtractor;
use larder_sync::CatalogTransformer;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{CatalogArgs, InventoryArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `larder locations`.
pub async fn handle_locations(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let locations = ctx.pos_client()?.get_locations().await?;
    output(&locations, flags.format)
}

/// Handle `larder catalog`.
pub async fn handle_catalog(
    args: &CatalogArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let objects = ctx.pos_client()?.get_catalog_items().await?;
    if !args.drafts {
        return output(&objects, flags.format);
    }

    let transform = CatalogTransformer::new(TextSignalExtractor::new())
        .transform(&objects, ctx.owner_id().unwrap_or_default());
    output(&transform.batch(), flags.format)
}

/// Handle `larder inventory`.
pub async fn handle_inventory(
    args: &InventoryArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let counts = ctx
        .pos_client()?
        .get_inventory_counts(&args.locations)
        .await?;
    output(&counts, flags.format)
}
