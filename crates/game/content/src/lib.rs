//! Data-driven enchantment content and loaders.
//!
//! This crate houses the built-in property catalog and provides loaders for data files:
//! - Property catalogs (data-driven via RON)
//! - Record configuration (data-driven via TOML)
//! - Record snapshots (persisted as JSON)
//!
//! All loaders produce `enchant-core` types directly through their serde derives.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, PropertyFile, PropertyLoader, RecordStore,
};
