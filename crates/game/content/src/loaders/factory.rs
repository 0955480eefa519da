//! Content factory for building catalogs and configs from a data directory.

use std::path::{Path, PathBuf};

use enchant_core::{PropertyCatalog, RecordConfig};

use crate::loaders::{ConfigLoader, LoadResult, PropertyLoader};

/// Content factory that loads enchantment content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── properties.ron   (optional; the built-in catalog is used when absent)
/// └── record.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const PROPERTIES_FILE: &'static str = "properties.ron";
    pub const CONFIG_FILE: &'static str = "record.toml";

    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the property catalog from `properties.ron`, falling back to the
    /// built-in catalog when the file does not exist.
    pub fn load_properties(&self) -> LoadResult<PropertyCatalog> {
        let path = self.properties_path();
        if path.exists() {
            PropertyLoader::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no catalog file, using built-in catalog");
            PropertyLoader::embedded()
        }
    }

    /// Load record configuration from `record.toml`.
    pub fn load_config(&self) -> LoadResult<RecordConfig> {
        ConfigLoader::load(&self.config_path())
    }

    pub fn properties_path(&self) -> PathBuf {
        self.data_dir.join(Self::PROPERTIES_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(Self::CONFIG_FILE)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(factory.config_path(), Path::new("/tmp/data/record.toml"));
    }

    #[test]
    fn falls_back_to_built_in_catalog() {
        let dir = tempfile::tempdir().expect("temp dir");
        let factory = ContentFactory::new(dir.path());

        let catalog = factory.load_properties().expect("built-in catalog");
        assert!(!catalog.is_empty());
        assert!(factory.load_config().is_err());
    }

    #[test]
    fn prefers_catalog_file_when_present() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(ContentFactory::PROPERTIES_FILE),
            r#"(properties: [(id: "only", name: "Only", category: Special,
                potential_cost: 5, material: Wood, material_cost: 1.0, cap: (base: 3))])"#,
        )
        .expect("write catalog");

        let catalog = ContentFactory::new(dir.path())
            .load_properties()
            .expect("file catalog");
        assert_eq!(catalog.len(), 1);
    }
}
