//! Snapshot export and data-tolerant import.
//!
//! A snapshot holds inputs only: configuration plus the raw step entries.
//! Every derived field is recomputed on import, so a snapshot written by
//! [`EnchantmentRecord::export_snapshot`] reproduces the ledger exactly.

use std::collections::HashSet;
use std::sync::Arc;

use super::{Enchantment, EnchantmentRecord, EnchantmentStep, RecordError, StepDraft, StepId};
use crate::catalog::{PropertyId, PropertyOracle};
use crate::config::{ConfigAdjustment, EquipmentType, RecordConfig, UnderstandingSkills};

/// Serialized record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RecordSnapshot {
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment_type: EquipmentType,
    pub player_level: u32,
    pub equipment_potential: i64,
    pub base_equipment_potential: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub smithing_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub anvil_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub understanding_skills: UnderstandingSkills,
    #[cfg_attr(feature = "serde", serde(default))]
    pub master_enhancement_level: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enchantment_steps: Vec<StepSnapshot>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StepSnapshot {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enchantments: Vec<EnchantmentSnapshot>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "std::ops::Not::not")
    )]
    pub is_ignored: bool,
}

/// Entry as stored on disk. Kept loose (`String`, `i64`) so import can
/// report bad entries instead of failing the whole file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EnchantmentSnapshot {
    pub property_id: String,
    pub value: i64,
}

impl RecordSnapshot {
    pub fn config(&self) -> RecordConfig {
        RecordConfig {
            equipment_type: self.equipment_type,
            player_level: self.player_level,
            equipment_potential: self.equipment_potential,
            base_equipment_potential: self.base_equipment_potential,
            smithing_level: self.smithing_level,
            anvil_level: self.anvil_level,
            understanding: self.understanding_skills,
            master_enhancement_level: self.master_enhancement_level,
        }
    }

    /// Empty snapshot for a configuration.
    pub fn from_config(config: &RecordConfig) -> Self {
        Self {
            equipment_type: config.equipment_type,
            player_level: config.player_level,
            equipment_potential: config.equipment_potential,
            base_equipment_potential: config.base_equipment_potential,
            smithing_level: config.smithing_level,
            anvil_level: config.anvil_level,
            understanding_skills: config.understanding,
            master_enhancement_level: config.master_enhancement_level,
            enchantment_steps: Vec::new(),
        }
    }
}

/// Why an entry was dropped on import.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DropReason {
    UnknownProperty,
    DeltaOutOfRange,
    DuplicateProperty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedEnchantment {
    pub step: StepId,
    pub property_id: String,
    pub value: i64,
    pub reason: DropReason,
}

/// Everything import had to repair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub config_adjustments: Vec<ConfigAdjustment>,
    pub dropped: Vec<DroppedEnchantment>,
    /// `(stored id, issued id)` for steps whose id was empty or repeated.
    pub reissued_ids: Vec<(String, StepId)>,
}

impl ImportReport {
    /// True when the snapshot was imported without any repair.
    pub fn is_clean(&self) -> bool {
        self.config_adjustments.is_empty() && self.dropped.is_empty() && self.reissued_ids.is_empty()
    }
}

impl EnchantmentRecord {
    /// Captures configuration and raw step entries.
    pub fn export_snapshot(&self) -> RecordSnapshot {
        let mut snapshot = RecordSnapshot::from_config(&self.config);
        snapshot.enchantment_steps = self
            .steps
            .iter()
            .map(|step| StepSnapshot {
                id: step.id.as_str().to_owned(),
                enchantments: step
                    .enchantments
                    .iter()
                    .map(|enchantment| EnchantmentSnapshot {
                        property_id: enchantment.property_id.as_str().to_owned(),
                        value: i64::from(enchantment.value),
                    })
                    .collect(),
                is_ignored: step.is_ignored,
            })
            .collect();
        snapshot
    }

    /// Rebuilds a record from a snapshot, repairing what it can.
    ///
    /// Out-of-range configuration is clamped. Entries naming unknown
    /// properties, carrying a delta beyond [`MAX_DELTA`](Self::MAX_DELTA), or
    /// repeating a property within their step are dropped. Empty or repeated
    /// step ids are re-issued. Every repair is logged and listed in the
    /// returned [`ImportReport`]; the ledger is then replayed in full.
    pub fn import_snapshot(
        catalog: Arc<dyn PropertyOracle>,
        snapshot: &RecordSnapshot,
    ) -> Result<(Self, ImportReport), RecordError> {
        let mut report = ImportReport::default();

        let (config, adjustments) = snapshot.config().sanitized();
        for adjustment in &adjustments {
            tracing::warn!(
                field = adjustment.field,
                from = adjustment.from,
                to = adjustment.to,
                "clamped imported config value"
            );
        }
        report.config_adjustments = adjustments;

        let mut record = Self::with_valid_config(catalog, config);
        record.next_sequence = snapshot
            .enchantment_steps
            .iter()
            .filter_map(|step| parse_sequence(&step.id))
            .max()
            .unwrap_or(0);

        for stored in &snapshot.enchantment_steps {
            let stored_id = StepId::new(stored.id.as_str());
            let id = if stored.id.is_empty() || record.position(&stored_id).is_some() {
                let (issued, sequence) = record.next_id();
                record.next_sequence = sequence;
                tracing::warn!(stored = %stored.id, issued = %issued, "re-issued step id");
                report.reissued_ids.push((stored.id.clone(), issued.clone()));
                issued
            } else {
                stored_id
            };

            let enchantments = record.accept_entries(&id, &stored.enchantments, &mut report);
            let mut draft = StepDraft::new(enchantments);
            draft.is_ignored = stored.is_ignored;
            record.steps.push(EnchantmentStep::pending(id, draft));
        }

        record.recalculate_all()?;
        tracing::info!(
            steps = record.steps.len(),
            clean = report.is_clean(),
            "record imported"
        );
        Ok((record, report))
    }

    fn accept_entries(
        &self,
        step: &StepId,
        entries: &[EnchantmentSnapshot],
        report: &mut ImportReport,
    ) -> Vec<Enchantment> {
        let mut seen = HashSet::new();
        let mut accepted = Vec::with_capacity(entries.len());
        for entry in entries {
            let property = PropertyId::new(entry.property_id.as_str());
            let reason = if !self.catalog.contains(&property) {
                Some(DropReason::UnknownProperty)
            } else if entry.value.unsigned_abs() > u64::from(Self::MAX_DELTA.unsigned_abs()) {
                Some(DropReason::DeltaOutOfRange)
            } else if !seen.insert(property.clone()) {
                Some(DropReason::DuplicateProperty)
            } else {
                None
            };

            match (reason, i32::try_from(entry.value)) {
                (None, Ok(value)) => accepted.push(Enchantment::new(property, value)),
                (reason, _) => {
                    let reason = reason.unwrap_or(DropReason::DeltaOutOfRange);
                    tracing::warn!(
                        step = %step,
                        property = %entry.property_id,
                        value = entry.value,
                        %reason,
                        "dropped imported enchantment"
                    );
                    report.dropped.push(DroppedEnchantment {
                        step: step.clone(),
                        property_id: entry.property_id.clone(),
                        value: entry.value,
                        reason,
                    });
                }
            }
        }
        accepted
    }
}

fn parse_sequence(id: &str) -> Option<u64> {
    id.strip_prefix("step-")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnchantCategory, MaterialType, PropertyCatalog, PropertyDefinition};
    use crate::fixed::Hundredths;

    fn catalog() -> Arc<dyn PropertyOracle> {
        Arc::new(
            PropertyCatalog::new([PropertyDefinition::new(
                "str",
                "Strength",
                EnchantCategory::Stats,
                10,
                MaterialType::Beast,
                Hundredths::from_int(5),
            )])
            .expect("valid catalog"),
        )
    }

    fn snapshot(steps: Vec<StepSnapshot>) -> RecordSnapshot {
        let mut snapshot = RecordSnapshot::from_config(&RecordConfig::default());
        snapshot.enchantment_steps = steps;
        snapshot
    }

    fn entry(property: &str, value: i64) -> EnchantmentSnapshot {
        EnchantmentSnapshot {
            property_id: property.to_owned(),
            value,
        }
    }

    #[test]
    fn drops_bad_entries_and_keeps_the_rest() {
        let snapshot = snapshot(vec![StepSnapshot {
            id: "step-1".into(),
            enchantments: vec![
                entry("str", 3),
                entry("luck", 2),
                entry("str", 1),
                entry("str", 9_999_999_999),
            ],
            is_ignored: false,
        }]);

        let (record, report) =
            EnchantmentRecord::import_snapshot(catalog(), &snapshot).expect("import");

        assert_eq!(record.steps()[0].enchantments(), [Enchantment::new("str", 3)]);
        let reasons: Vec<_> = report.dropped.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            [
                DropReason::UnknownProperty,
                DropReason::DuplicateProperty,
                DropReason::DeltaOutOfRange,
            ]
        );
    }

    #[test]
    fn reissues_empty_and_repeated_ids() {
        let step = |id: &str| StepSnapshot {
            id: id.into(),
            enchantments: vec![entry("str", 1)],
            is_ignored: false,
        };
        let snapshot = snapshot(vec![step("step-4"), step("step-4"), step("")]);

        let (record, report) =
            EnchantmentRecord::import_snapshot(catalog(), &snapshot).expect("import");

        let ids: Vec<_> = record.steps().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["step-4", "step-5", "step-6"]);
        assert_eq!(report.reissued_ids.len(), 2);
    }

    #[test]
    fn clamps_out_of_range_config() {
        let mut snapshot = snapshot(Vec::new());
        snapshot.player_level = 50;
        snapshot.base_equipment_potential = 0;

        let (record, report) =
            EnchantmentRecord::import_snapshot(catalog(), &snapshot).expect("import");

        assert_eq!(record.config().player_level, RecordConfig::MIN_PLAYER_LEVEL);
        assert_eq!(record.config().base_equipment_potential, 1);
        assert_eq!(report.config_adjustments.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn export_skips_derived_data() {
        let mut record =
            EnchantmentRecord::new(catalog(), RecordConfig::default()).expect("record");
        record
            .add_step(StepDraft::new([Enchantment::new("str", 2)]).ignored())
            .expect("add");

        let exported = record.export_snapshot();
        assert_eq!(
            exported.enchantment_steps,
            [StepSnapshot {
                id: "step-1".into(),
                enchantments: vec![entry("str", 2)],
                is_ignored: true,
            }]
        );
    }
}
