//! Catalog listing: `GET /catalog/list`, followed page by page.

use std::collections::{BTreeMap, HashSet};

use larder_core::entities::ExternalCatalogItem;
use larder_core::enums::CatalogObjectKind;
use serde::Deserialize;

use crate::PosClient;
use crate::error::PosError;
use crate::http::read_json;

const CATALOG_TYPES: &str = "ITEM,ITEM_VARIATION,CATEGORY";

// Guards against a provider that keeps returning a cursor.
const MAX_PAGES: usize = 1000;

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    objects: Vec<CatalogObject>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogObject {
    #[serde(rename = "type")]
    object_type: String,
    id: String,
    #[serde(default)]
    item_data: Option<ItemData>,
    #[serde(default)]
    item_variation_data: Option<VariationData>,
    #[serde(default)]
    category_data: Option<CategoryData>,
    #[serde(default)]
    custom_attribute_values: BTreeMap<String, CustomAttributeValue>,
}

#[derive(Debug, Deserialize)]
struct ItemData {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    variations: Vec<CatalogObject>,
}

#[derive(Debug, Deserialize)]
struct VariationData {
    #[serde(default)]
    name: String,
    #[serde(default)]
    item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryData {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CustomAttributeValue {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    string_value: Option<String>,
    #[serde(default)]
    number_value: Option<String>,
    #[serde(default)]
    boolean_value: Option<bool>,
}

impl CustomAttributeValue {
    fn to_json(&self) -> serde_json::Value {
        if let Some(s) = &self.string_value {
            serde_json::Value::String(s.clone())
        } else if let Some(n) = &self.number_value {
            n.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or_else(|| serde_json::Value::String(n.clone()), serde_json::Value::Number)
        } else if let Some(b) = self.boolean_value {
            serde_json::Value::Bool(b)
        } else {
            serde_json::Value::Null
        }
    }
}

impl CatalogObject {
    /// Flatten into local catalog objects. Nested item variations are
    /// emitted after their item.
    fn into_external(self, out: &mut Vec<ExternalCatalogItem>) {
        let Some(kind) = CatalogObjectKind::from_wire(&self.object_type) else {
            tracing::trace!(id = %self.id, kind = %self.object_type, "skipping catalog object");
            return;
        };

        let custom_attributes = self
            .custom_attribute_values
            .iter()
            .map(|(key, value)| {
                let name = value.name.clone().unwrap_or_else(|| key.clone());
                (name, value.to_json())
            })
            .collect();

        let mut object = ExternalCatalogItem {
            id: self.id,
            kind,
            name: String::new(),
            description: String::new(),
            category_ref: None,
            parent_ref: None,
            custom_attributes,
        };
        let mut nested = Vec::new();
        match kind {
            CatalogObjectKind::Item => {
                if let Some(data) = self.item_data {
                    object.name = data.name;
                    object.description = data.description.unwrap_or_default();
                    object.category_ref = data.category_id;
                    nested = data.variations;
                }
            }
            CatalogObjectKind::Variation => {
                if let Some(data) = self.item_variation_data {
                    object.name = data.name;
                    object.parent_ref = data.item_id;
                }
            }
            CatalogObjectKind::Category => {
                if let Some(data) = self.category_data {
                    object.name = data.name;
                }
            }
        }

        out.push(object);
        for variation in nested {
            variation.into_external(out);
        }
    }
}

impl PosClient {
    /// All items, variations and categories, following the cursor until
    /// the provider stops returning one.
    ///
    /// Restricted to `sync.location_ids` when configured. Objects of other
    /// types are dropped; an object seen twice (nested and top-level) is
    /// kept once.
    ///
    /// # Errors
    ///
    /// Returns any HTTP, API or parse error. A 401 is retried once after a
    /// token refresh.
    pub async fn get_catalog_items(&self) -> Result<Vec<ExternalCatalogItem>, PosError> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;

        for page_number in 1..=MAX_PAGES {
            let url = self.catalog_page_url(cursor.as_deref());
            let resp = self.send_authorized(|client| client.get(&url)).await?;
            let page: CatalogPage = read_json(resp, "catalog page").await?;
            tracing::debug!(
                page = page_number,
                objects = page.objects.len(),
                "fetched catalog page"
            );

            for object in page.objects {
                object.into_external(&mut objects);
            }
            cursor = page.cursor.filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }
        if cursor.is_some() {
            tracing::warn!(max_pages = MAX_PAGES, "catalog pagination stopped early");
        }

        let mut seen = HashSet::new();
        objects.retain(|object| seen.insert(object.id.clone()));
        Ok(objects)
    }

    fn catalog_page_url(&self, cursor: Option<&str>) -> String {
        let mut url = format!("{}?types={CATALOG_TYPES}", self.api_url("/catalog/list"));
        if !self.location_ids.is_empty() {
            url.push_str("&location_ids=");
            url.push_str(&urlencoding::encode(&self.location_ids.join(",")));
        }
        if let Some(cursor) = cursor {
            url.push_str("&cursor=");
            url.push_str(&urlencoding::encode(cursor));
        }
        url
    }
}
