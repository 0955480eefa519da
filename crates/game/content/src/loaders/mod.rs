//! Content loaders for reading enchantment data from files.
//!
//! Each loader turns one file format into `enchant-core` types:
//! - RON property catalogs ([`PropertyLoader`])
//! - TOML record configuration ([`ConfigLoader`])
//! - JSON record snapshots ([`RecordStore`])

pub mod config;
pub mod factory;
pub mod properties;
pub mod record;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use properties::{PropertyFile, PropertyLoader};
pub use record::RecordStore;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
