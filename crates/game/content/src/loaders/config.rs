//! Record configuration loader.

use std::path::Path;

use anyhow::Context;
use enchant_core::RecordConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for record configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing a RecordConfig
    ///
    /// # Returns
    ///
    /// Returns a RecordConfig that passed [`RecordConfig::validate`].
    pub fn load(path: &Path) -> LoadResult<RecordConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid record config {}", path.display()))
    }

    /// Parse config TOML text.
    pub fn parse(source: &str) -> LoadResult<RecordConfig> {
        let config: RecordConfig = toml::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}
