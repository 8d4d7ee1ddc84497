use larder_sync::{SyncValidator, ValidationOptions};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `larder validate`. Naming conflicts are checked against the
/// local store.
pub fn handle(args: &ValidateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let batch = super::read_batch(&args.file)?;
    let options = if args.strict {
        ValidationOptions::strict()
    } else {
        ValidationOptions::default()
    };
    let local = ctx.store.snapshot()?;
    let result = SyncValidator::new(options).validate_against(&batch, &local);
    output(&result, flags.format)
}
