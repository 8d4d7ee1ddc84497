use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CatalogObjectKind;

/// One object from the external point-of-sale catalog. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExternalCatalogItem {
    pub id: String,
    pub kind: CatalogObjectKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Category object ID (items only).
    pub category_ref: Option<String>,
    /// Owning item ID (variations only).
    #[serde(default)]
    pub parent_ref: Option<String>,
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, serde_json::Value>,
}

impl ExternalCatalogItem {
    #[must_use]
    pub fn is_item(&self) -> bool {
        self.kind == CatalogObjectKind::Item
    }

    /// String-valued custom attributes, in key order.
    pub fn string_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.custom_attributes
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|v| (key.as_str(), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_attributes_skip_non_strings() {
        let mut custom_attributes = BTreeMap::new();
        custom_attributes.insert("allergen_notes".to_string(), serde_json::json!("contains nuts"));
        custom_attributes.insert("spice_level".to_string(), serde_json::json!(3));
        let item = ExternalCatalogItem {
            id: "EXT1".into(),
            kind: CatalogObjectKind::Item,
            name: "Pad Thai".into(),
            description: String::new(),
            category_ref: None,
            parent_ref: None,
            custom_attributes,
        };

        let attrs: Vec<_> = item.string_attributes().collect();
        assert_eq!(attrs, vec![("allergen_notes", "contains nuts")]);
        assert!(item.is_item());
    }
}
