//! Read-only property data.
//!
//! The engine never reaches for global property objects. Everything it knows
//! about an attribute comes through a [`PropertyOracle`] injected by the
//! caller; [`PropertyCatalog`] is the in-memory implementation.
mod error;
mod property;
mod registry;

pub use error::CatalogError;
pub use property::{
    EnchantCategory, MaterialType, PropertyDefinition, PropertyId, ValueBounds, ValueCap,
};
pub use registry::PropertyCatalog;

/// Lookup of property definitions by id.
pub trait PropertyOracle: Send + Sync {
    fn definition(&self, id: &PropertyId) -> Option<&PropertyDefinition>;

    /// Every definition, in catalog order.
    fn definitions(&self) -> &[PropertyDefinition];

    fn contains(&self, id: &PropertyId) -> bool {
        self.definition(id).is_some()
    }
}
