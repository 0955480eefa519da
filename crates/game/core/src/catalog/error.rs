//! Catalog construction errors.

use crate::catalog::PropertyId;
use crate::error::{EnchantError, ErrorSeverity};

/// Errors raised while building a [`PropertyCatalog`](crate::catalog::PropertyCatalog).
///
/// A catalog that fails these checks cannot drive the engine, so every
/// variant is fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("property '{0}' is defined more than once")]
    DuplicateProperty(PropertyId),

    #[error("property '{0}' has a zero potential cost")]
    ZeroPotentialCost(PropertyId),

    #[error("property '{0}' has a zero edit increment")]
    ZeroIncrement(PropertyId),

    #[error("property '{0}' has a negative material cost")]
    NegativeMaterialCost(PropertyId),
}

impl EnchantError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use CatalogError::*;
        match self {
            DuplicateProperty(_) => "CATALOG_DUPLICATE_PROPERTY",
            ZeroPotentialCost(_) => "CATALOG_ZERO_POTENTIAL_COST",
            ZeroIncrement(_) => "CATALOG_ZERO_INCREMENT",
            NegativeMaterialCost(_) => "CATALOG_NEGATIVE_MATERIAL_COST",
        }
    }
}
