use std::sync::Arc;

use larder_core::store::LocalStore;
use larder_sync::{ImportOrchestrator, SyncValidator, ValidationOptions};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `larder import`.
pub async fn handle(
    args: &ImportArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let batch = super::read_batch(&args.file)?;

    if args.validate {
        let result = SyncValidator::new(ValidationOptions::default()).validate(
            &batch.allergens,
            &batch.ingredients,
            &batch.menu_items,
        );
        if !result.is_valid {
            output(&result, flags.format)?;
            anyhow::bail!("{} has {} validation error(s)", args.file, result.errors.len());
        }
    }

    let store: Arc<dyn LocalStore> = ctx.store.clone();
    let report = ImportOrchestrator::new(store)
        .process_import(&batch.allergens, &batch.ingredients, &batch.menu_items)
        .await?;
    ctx.store.save()?;
    output(&report, flags.format)
}
