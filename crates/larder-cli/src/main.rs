use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod callback;
mod cli;
mod commands;
mod context;
mod output;
mod store;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("larder: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(flags.quiet, flags.verbose)?;

    // Commands that need neither configuration nor the local store.
    match &cli.command {
        cli::Commands::Extract(args) => return commands::extract::handle(args, &flags),
        cli::Commands::Schema(args) => return commands::schema::handle(args, &flags),
        _ => {}
    }

    let config = larder_config::LarderConfig::load_with_dotenv()?;
    let ctx = context::AppContext::init(config, &flags)?;
    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

/// Log to stderr. `LARDER_LOG` takes precedence over the flags.
fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, true) => "debug",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_env("LARDER_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install log subscriber: {e}"))
}
