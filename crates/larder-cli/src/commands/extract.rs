use larder_extract::{SignalExtractor, TextSignalExtractor};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExtractArgs;
use crate::output::output;

/// Handle `larder extract`.
pub fn handle(args: &ExtractArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let result = TextSignalExtractor::new().extract(&args.text);
    output(&result, flags.format)
}
