//! Deterministic enchantment ledger shared by every front end.
//!
//! `enchant-core` holds the canonical rules: the property catalog, the pure
//! potential/material/success calculators, and the step ledger that replays
//! them. It performs no I/O. All ledger mutation flows through
//! [`record::EnchantmentRecord`], and loaders in other crates only produce the
//! types re-exported here.
pub mod calc;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fixed;
pub mod record;

pub use calc::{AttributeChange, MaterialCosts, StepPotential};
pub use catalog::{
    CatalogError, EnchantCategory, MaterialType, PropertyCatalog, PropertyDefinition, PropertyId,
    PropertyOracle, ValueBounds, ValueCap,
};
pub use config::{ConfigAdjustment, ConfigError, EquipmentType, RecordConfig, UnderstandingSkills};
pub use error::{EnchantError, ErrorSeverity};
pub use fixed::Hundredths;
pub use record::{
    DerivedStep, DropReason, DroppedEnchantment, Enchantment, EnchantmentRecord,
    EnchantmentSnapshot, EnchantmentStep, FinalSuccessRates, ImportReport, RecordError,
    RecordSnapshot, StepDraft, StepId, StepSnapshot,
};
