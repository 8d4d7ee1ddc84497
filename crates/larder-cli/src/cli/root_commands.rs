use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{AuthCommands, WebhookCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Extract ingredient and allergen signals from free text.
    Extract(ExtractArgs),
    /// Validate a draft batch file against itself and the local store.
    Validate(ValidateArgs),
    /// Import a draft batch file into the local store.
    Import(ImportArgs),
    /// OAuth authorization with the point-of-sale provider.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// List the merchant's locations.
    Locations,
    /// Fetch the remote catalog.
    Catalog(CatalogArgs),
    /// Fetch inventory counts.
    Inventory(InventoryArgs),
    /// Webhook subscription and delivery handling.
    Webhooks {
        #[command(subcommand)]
        action: WebhookCommands,
    },
    /// Reconcile the remote catalog into the local store.
    Sync,
    /// Print the JSON Schema of a data type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArgs {
    /// Text to scan, e.g. a menu item description.
    pub text: String,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Path to a draft batch JSON file.
    pub file: String,
    /// Also check cross-references between lists in the batch.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Path to a draft batch JSON file.
    pub file: String,
    /// Refuse to import when validation reports errors.
    #[arg(long)]
    pub validate: bool,
}

#[derive(Clone, Debug, Args)]
pub struct CatalogArgs {
    /// Show the drafts the catalog transforms into instead of raw objects.
    #[arg(long)]
    pub drafts: bool,
}

#[derive(Clone, Debug, Args)]
pub struct InventoryArgs {
    /// Location IDs (defaults to sync.location_ids).
    #[arg(long = "location")]
    pub locations: Vec<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Allergen,
    Ingredient,
    MenuItem,
    CatalogItem,
    Mapping,
    Batch,
    Snapshot,
    Extraction,
    Validation,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type to describe.
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
