//! Subcommand implementations.
//!
//! Every editing command follows the same cycle: import the record file,
//! apply one ledger operation, and write the snapshot back.

mod catalog;
mod configure;
mod edit;
mod new;
mod show;

pub use catalog::CatalogCmd;
pub use configure::Configure;
pub use edit::{Add, Ignore, Move, Remove, Update};
pub use new::New;
pub use show::Show;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use console::style;
use enchant_content::{ContentFactory, PropertyLoader, RecordStore};
use enchant_core::{
    Enchantment, EnchantmentRecord, ImportReport, MaterialType, PropertyCatalog, PropertyOracle,
};

use crate::config::AppConfig;

/// Resolved inputs shared by all commands.
pub struct Session {
    pub catalog: Arc<PropertyCatalog>,
    pub data_dir: Option<PathBuf>,
}

impl Session {
    /// Picks the catalog: explicit path first, then the data directory, then
    /// the built-in catalog.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let catalog = match (&config.catalog_path, &config.data_dir) {
            (Some(path), _) => PropertyLoader::load(path)?,
            (None, Some(dir)) => ContentFactory::new(dir).load_properties()?,
            (None, None) => PropertyLoader::embedded()?,
        };
        Ok(Self {
            catalog: Arc::new(catalog),
            data_dir: config.data_dir.clone(),
        })
    }

    pub fn oracle(&self) -> Arc<dyn PropertyOracle> {
        self.catalog.clone()
    }

    /// Imports a record file and replays it.
    pub fn load_record(&self, path: &Path) -> Result<EnchantmentRecord> {
        let snapshot = RecordStore::load(path)?;
        let (record, report) = EnchantmentRecord::import_snapshot(self.oracle(), &snapshot)
            .with_context(|| format!("Failed to replay record {}", path.display()))?;
        print_import_report(&report);
        Ok(record)
    }

    pub fn save_record(&self, path: &Path, record: &EnchantmentRecord) -> Result<()> {
        RecordStore::save(path, &record.export_snapshot())
    }
}

fn print_import_report(report: &ImportReport) {
    if report.is_clean() {
        return;
    }
    eprintln!("{}", style("! Record needed repairs on import").yellow().bold());
    for adjustment in &report.config_adjustments {
        eprintln!(
            "  {} clamped {} → {}",
            style(adjustment.field).cyan(),
            adjustment.from,
            adjustment.to
        );
    }
    for dropped in &report.dropped {
        eprintln!(
            "  {} dropped {}={} ({})",
            style(&dropped.step).cyan(),
            dropped.property_id,
            dropped.value,
            dropped.reason
        );
    }
    for (stored, issued) in &report.reissued_ids {
        eprintln!("  step id {:?} re-issued as {}", stored, style(issued).cyan());
    }
}

/// Parses `PROP=DELTA` (e.g. `str=5`, `dex=-3`).
pub fn parse_enchantment(raw: &str) -> Result<Enchantment, String> {
    let (property, delta) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PROP=DELTA, got `{raw}`"))?;
    let property = property.trim();
    if property.is_empty() {
        return Err(format!("missing property in `{raw}`"));
    }
    let delta = delta
        .trim()
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|e| format!("invalid delta in `{raw}`: {e}"))?;
    Ok(Enchantment::new(property, delta))
}

/// Parses `MATERIAL=LEVEL` (e.g. `metal=40`).
pub fn parse_understanding(raw: &str) -> Result<(MaterialType, u8), String> {
    let (material, level) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected MATERIAL=LEVEL, got `{raw}`"))?;
    let material = material
        .trim()
        .to_lowercase()
        .parse::<MaterialType>()
        .map_err(|_| format!("unknown material `{}`", material.trim()))?;
    let level = level
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("invalid level in `{raw}`: {e}"))?;
    Ok((material, level))
}

pub(crate) fn require_file(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(anyhow!("Record file not found: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_deltas() {
        assert_eq!(
            parse_enchantment("str=5").expect("valid"),
            Enchantment::new("str", 5)
        );
        assert_eq!(
            parse_enchantment("dex=-3").expect("valid"),
            Enchantment::new("dex", -3)
        );
        assert_eq!(
            parse_enchantment(" atk = +12 ").expect("valid"),
            Enchantment::new("atk", 12)
        );
    }

    #[test]
    fn rejects_malformed_deltas() {
        assert!(parse_enchantment("str").is_err());
        assert!(parse_enchantment("=4").is_err());
        assert!(parse_enchantment("str=1.5").is_err());
        assert!(parse_enchantment("str=99999999999").is_err());
    }

    #[test]
    fn parses_understanding_levels() {
        assert_eq!(
            parse_understanding("Metal=40").expect("valid"),
            (MaterialType::Metal, 40)
        );
        assert!(parse_understanding("stone=4").is_err());
        assert!(parse_understanding("mana=300").is_err());
    }

    #[test]
    fn session_falls_back_to_built_in_catalog() {
        let session = Session::open(&AppConfig::default()).expect("session");
        assert!(!session.catalog.is_empty());
    }

    #[test]
    fn record_round_trip_through_session() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("record.json");
        let session = Session::open(&AppConfig::default()).expect("session");

        let mut record =
            EnchantmentRecord::new(session.oracle(), Default::default()).expect("record");
        record
            .add_step(enchant_core::StepDraft::new([Enchantment::new("str", 4)]))
            .expect("add");
        session.save_record(&path, &record).expect("save");

        let loaded = session.load_record(&path).expect("load");
        assert_eq!(loaded.steps(), record.steps());
    }
}
