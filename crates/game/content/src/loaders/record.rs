//! Record snapshot storage.

use std::path::Path;

use anyhow::Context;
use enchant_core::RecordSnapshot;

use crate::loaders::{LoadResult, read_file};

/// Reads and writes record snapshots as pretty-printed JSON.
pub struct RecordStore;

impl RecordStore {
    pub fn load(path: &Path) -> LoadResult<RecordSnapshot> {
        let content = read_file(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse record JSON {}", path.display()))
    }

    /// Writes `snapshot` to `path`, replacing any existing file.
    pub fn save(path: &Path, snapshot: &RecordSnapshot) -> LoadResult<()> {
        let mut json = serde_json::to_string_pretty(snapshot).context("Failed to encode record")?;
        json.push('\n');
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write record {}", path.display()))?;
        tracing::debug!(path = %path.display(), steps = snapshot.enchantment_steps.len(), "saved record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use enchant_core::{EnchantmentSnapshot, RecordConfig, StepSnapshot};

    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("record.json");

        let mut snapshot = RecordSnapshot::from_config(&RecordConfig::default());
        snapshot.enchantment_steps.push(StepSnapshot {
            id: "step-1".into(),
            enchantments: vec![EnchantmentSnapshot {
                property_id: "str".into(),
                value: 7,
            }],
            is_ignored: false,
        });

        RecordStore::save(&path, &snapshot).expect("save");
        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(text.contains("\"propertyId\": \"str\""));
        assert!(!text.contains("isIgnored"));

        assert_eq!(RecordStore::load(&path).expect("load"), snapshot);
    }

    #[test]
    fn malformed_json_reports_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");

        let err = RecordStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
