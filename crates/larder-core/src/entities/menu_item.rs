use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityStatus;

/// A menu item. Every ingredient reference resolved when it was created.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ingredient_ids: Vec<String>,
    pub status: EntityStatus,
}
