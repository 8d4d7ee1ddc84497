use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `larder` binary.
#[derive(Debug, Parser)]
#[command(
    name = "larder",
    version,
    about = "Larder - reconcile a point-of-sale catalog into the kitchen store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print results as pretty (json) or compact (raw) JSON
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Account owner (defaults to general.owner_id)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Data directory (defaults to general.data_dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

impl Cli {
    /// Flags every handler receives, detached from the parsed command.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            owner: self.owner.clone(),
            data_dir: self.data_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{AuthCommands, WebhookCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn command_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_before_the_command() {
        let cli = Cli::try_parse_from(["larder", "--format", "raw", "--verbose", "sync"])
            .expect("parses");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Sync));
    }

    #[test]
    fn flags_after_the_command() {
        let cli = Cli::try_parse_from(["larder", "locations", "--quiet", "--owner", "kitchen-1"])
            .expect("parses");

        assert!(cli.quiet);
        assert_eq!(cli.global_flags().owner.as_deref(), Some("kitchen-1"));
        assert!(matches!(cli.command, Commands::Locations));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["larder", "--format", "table", "sync"]).is_err());
    }

    #[test]
    fn validate_takes_strict_flag() {
        let cli = Cli::try_parse_from(["larder", "validate", "batch.json", "--strict"])
            .expect("parses");
        match cli.command {
            Commands::Validate(args) => {
                assert!(args.strict);
                assert_eq!(args.file, "batch.json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn auth_exchange_requires_code_and_state() {
        assert!(Cli::try_parse_from(["larder", "auth", "exchange", "--code", "c"]).is_err());
        let cli = Cli::try_parse_from([
            "larder", "auth", "exchange", "--code", "c", "--state", "s",
        ])
        .expect("parses");
        assert!(matches!(
            cli.command,
            Commands::Auth {
                action: AuthCommands::Exchange(_)
            }
        ));
    }

    #[test]
    fn webhook_verify_parses() {
        let cli = Cli::try_parse_from([
            "larder",
            "webhooks",
            "verify",
            "event.json",
            "--signature",
            "abc=",
            "--process",
        ])
        .expect("parses");
        match cli.command {
            Commands::Webhooks {
                action: WebhookCommands::Verify(args),
            } => {
                assert_eq!(args.body, "event.json");
                assert!(args.process);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
