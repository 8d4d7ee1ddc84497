//! Entity structs for the local kitchen store and the external catalog.
//!
//! Local records (`Allergen`, `Ingredient`, `MenuItem`) are owned by the
//! store. `ExternalCatalogItem` is read-only input from the point-of-sale
//! system; `SyncMapping` joins the two.

mod allergen;
mod catalog;
mod ingredient;
mod mapping;
mod menu_item;

pub use allergen::Allergen;
pub use catalog::ExternalCatalogItem;
pub use ingredient::Ingredient;
pub use mapping::SyncMapping;
pub use menu_item::MenuItem;
