//! Property catalog loader.

use std::path::Path;

use anyhow::Context;
use enchant_core::{PropertyCatalog, PropertyDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Catalog built into the crate.
const EMBEDDED_PROPERTIES: &str = include_str!("../../data/properties.ron");

/// Property catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFile {
    pub properties: Vec<PropertyDefinition>,
}

/// Loader for property catalogs from RON files.
pub struct PropertyLoader;

impl PropertyLoader {
    /// Load a property catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a [`PropertyFile`]
    ///
    /// # Returns
    ///
    /// Returns a validated [`PropertyCatalog`].
    pub fn load(path: &Path) -> LoadResult<PropertyCatalog> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)
            .with_context(|| format!("Invalid property catalog {}", path.display()))?;
        tracing::info!(path = %path.display(), properties = catalog.len(), "loaded property catalog");
        Ok(catalog)
    }

    /// Load the catalog compiled into this crate.
    pub fn embedded() -> LoadResult<PropertyCatalog> {
        Self::parse(EMBEDDED_PROPERTIES).context("Invalid built-in property catalog")
    }

    /// Parse catalog RON text.
    pub fn parse(source: &str) -> LoadResult<PropertyCatalog> {
        let file: PropertyFile = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse property catalog RON: {}", e))?;
        let catalog = PropertyCatalog::new(file.properties)?;
        tracing::debug!(properties = catalog.len(), "parsed property catalog");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use enchant_core::{EnchantCategory, MaterialType, PropertyId, PropertyOracle};

    use super::*;

    #[test]
    fn embedded_catalog_is_valid() {
        let catalog = PropertyLoader::embedded().expect("embedded catalog");
        assert_eq!(catalog.len(), 23);

        let atk = catalog
            .definition(&PropertyId::from("atk"))
            .expect("atk is built in");
        assert_eq!(atk.category, EnchantCategory::Attack);
        assert_eq!(atk.material, MaterialType::Metal);
        assert_eq!(atk.attenuation_threshold, Some(20));
        assert!(atk.armor_double_potential && !atk.weapon_double_potential);

        let aspd = catalog
            .definition(&PropertyId::from("aspd"))
            .expect("aspd is built in");
        assert_eq!(aspd.increment_at(10), 5);
        assert_eq!(aspd.increment_at(60), 10);
        assert_eq!(aspd.bounds(300).max, 400);
    }

    #[test]
    fn every_category_is_represented() {
        use strum::IntoEnumIterator;

        let catalog = PropertyLoader::embedded().expect("embedded catalog");
        for category in EnchantCategory::iter() {
            assert!(
                catalog.by_category(category).next().is_some(),
                "no {category} property"
            );
        }
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"(properties: [(
                id: "luk", name: "LUK", category: Stats,
                potential_cost: 10, material: Beast, material_cost: 4.0,
                cap: (base: 5),
            )])"#
        )
        .expect("write catalog");

        let catalog = PropertyLoader::load(file.path()).expect("load");
        assert_eq!(catalog.len(), 1);
        let luk = catalog
            .definition(&PropertyId::from("luk"))
            .expect("luk");
        assert_eq!(luk.increment_below, 1);
        assert_eq!(luk.attenuation_threshold, None);
        assert_eq!(luk.bounds(400).max, 5);
    }

    #[test]
    fn duplicate_ids_fail_to_load() {
        let entry = r#"(id: "x", name: "X", category: Stats, potential_cost: 1,
            material: Beast, material_cost: 1.0, cap: (base: 5))"#;
        let source = format!("(properties: [{entry}, {entry}])");
        let err = PropertyLoader::parse(&source).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = PropertyLoader::load(Path::new("/nonexistent/properties.ron")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/properties.ron"));
    }
}
