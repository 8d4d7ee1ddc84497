use larder_core::drafts::DraftBatch;
use larder_core::entities::{Allergen, ExternalCatalogItem, Ingredient, MenuItem, SyncMapping};
use larder_core::results::{ExtractionResult, ValidationResult};
use larder_core::store::StoreSnapshot;
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `larder schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::Allergen => schema_for!(Allergen),
        SchemaType::Ingredient => schema_for!(Ingredient),
        SchemaType::MenuItem => schema_for!(MenuItem),
        SchemaType::CatalogItem => schema_for!(ExternalCatalogItem),
        SchemaType::Mapping => schema_for!(SyncMapping),
        SchemaType::Batch => schema_for!(DraftBatch),
        SchemaType::Snapshot => schema_for!(StoreSnapshot),
        SchemaType::Extraction => schema_for!(ExtractionResult),
        SchemaType::Validation => schema_for!(ValidationResult),
    };
    output(&schema, flags.format)
}
