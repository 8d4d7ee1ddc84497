use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Validate(args) => commands::validate::handle(&args, ctx, flags),
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Auth { action } => commands::auth::handle(&action, ctx, flags).await,
        Commands::Locations => commands::catalog::handle_locations(ctx, flags).await,
        Commands::Catalog(args) => commands::catalog::handle_catalog(&args, ctx, flags).await,
        Commands::Inventory(args) => commands::catalog::handle_inventory(&args, ctx, flags).await,
        Commands::Webhooks { action } => commands::webhooks::handle(&action, ctx, flags).await,
        Commands::Sync => commands::sync::handle(ctx, flags).await,
        Commands::Extract(_) | Commands::Schema(_) => {
            unreachable!("extract/schema are pre-dispatched in main")
        }
    }
}
