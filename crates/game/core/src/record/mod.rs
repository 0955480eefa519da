//! The enchantment ledger.
//!
//! [`EnchantmentRecord`] owns the ordered steps of one crafting session and
//! keeps every step's derived bundle consistent with its prefix. Each step's
//! cost depends on the attribute values and touched set left by all earlier
//! steps, so any edit before the tail replays the ledger from the head. All
//! edits are computed on a copy and committed only when they succeed.

mod error;
mod replay;
mod snapshot;
mod step;

pub use error::RecordError;
pub use snapshot::{
    DropReason, DroppedEnchantment, EnchantmentSnapshot, ImportReport, RecordSnapshot,
    StepSnapshot,
};
pub use step::{DerivedStep, Enchantment, EnchantmentStep, StepDraft, StepId};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use replay::{LedgerCursor, derive_step, replay_from};

use crate::calc::MaterialCosts;
use crate::catalog::{MaterialType, PropertyId, PropertyOracle};
use crate::config::{EquipmentType, RecordConfig};
use crate::fixed::Hundredths;

/// Success rates of the last non-ignored step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalSuccessRates {
    pub single: i64,
    pub expected: Hundredths,
}

/// Stateful step ledger for one piece of equipment.
///
/// # Lifecycle
///
/// 1. Created from a validated [`RecordConfig`] (or imported from a snapshot)
/// 2. Steps are appended, inserted, edited, reordered, and removed
/// 3. Config setters mark the ledger stale until [`recalculate_all`](Self::recalculate_all)
///
/// The property catalog is shared read-only; the ledger itself is owned
/// exclusively by the record.
#[derive(Clone)]
pub struct EnchantmentRecord {
    catalog: Arc<dyn PropertyOracle>,
    config: RecordConfig,
    steps: Vec<EnchantmentStep>,
    next_sequence: u64,
    stale: bool,
}

impl fmt::Debug for EnchantmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnchantmentRecord")
            .field("config", &self.config)
            .field("steps", &self.steps)
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}

impl EnchantmentRecord {
    /// Largest absolute delta a single entry may carry.
    pub const MAX_DELTA: i32 = 1_000;

    /// Creates an empty record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Config` if the configuration is out of range.
    pub fn new(catalog: Arc<dyn PropertyOracle>, config: RecordConfig) -> Result<Self, RecordError> {
        config.validate()?;
        Ok(Self::with_valid_config(catalog, config))
    }

    fn with_valid_config(catalog: Arc<dyn PropertyOracle>, config: RecordConfig) -> Self {
        Self {
            catalog,
            config,
            steps: Vec::new(),
            next_sequence: 0,
            stale: false,
        }
    }

    // ===== queries =====

    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn PropertyOracle {
        self.catalog.as_ref()
    }

    pub fn steps(&self) -> &[EnchantmentStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|step| &step.id == id)
    }

    pub fn step(&self, id: &StepId) -> Option<&EnchantmentStep> {
        self.position(id).map(|index| &self.steps[index])
    }

    /// True after a config change until the next replay.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Attribute values after the last step.
    pub fn current_properties(&self) -> BTreeMap<PropertyId, i32> {
        self.steps
            .last()
            .map(|step| step.derived.current_properties.clone())
            .unwrap_or_default()
    }

    /// Cumulative material cost of the whole ledger.
    pub fn final_material_totals(&self) -> MaterialCosts {
        self.steps
            .last()
            .map(|step| step.derived.total_material_costs)
            .unwrap_or_default()
    }

    /// Potential after the last step, or the starting potential of an empty ledger.
    pub fn final_potential(&self) -> i64 {
        self.steps
            .last()
            .map(|step| step.derived.post_enchantment_potential)
            .unwrap_or(self.config.equipment_potential)
    }

    /// Rates of the last non-ignored step, if any.
    pub fn final_success_rates(&self) -> Option<FinalSuccessRates> {
        self.steps
            .iter()
            .rev()
            .find(|step| !step.is_ignored)
            .map(|step| FinalSuccessRates {
                single: step.derived.single_success_rate,
                expected: step.derived.expected_success_rate,
            })
    }

    // ===== step edits =====

    /// Appends a step and returns its id.
    ///
    /// Only the new step is derived, from its predecessor's bundle. A stale
    /// ledger is replayed in full instead.
    pub fn add_step(&mut self, draft: StepDraft) -> Result<StepId, RecordError> {
        if self.stale {
            return self.insert_step(self.steps.len(), draft);
        }

        self.validate_enchantments(&draft.enchantments)?;
        let (id, sequence) = self.next_id();
        let mut step = EnchantmentStep::pending(id.clone(), draft);
        let cursor = LedgerCursor::before(&self.steps, self.steps.len(), &self.config);
        step.derived = derive_step(
            &step.enchantments,
            step.is_ignored,
            &cursor,
            &self.config,
            self.catalog.as_ref(),
        )?;
        self.check_bounds(&step)?;

        self.steps.push(step);
        self.next_sequence = sequence;
        tracing::info!(step = %id, index = self.steps.len() - 1, "step appended");
        Ok(id)
    }

    /// Inserts a step at `index` (`index == len` appends) and replays the ledger.
    pub fn insert_step(&mut self, index: usize, draft: StepDraft) -> Result<StepId, RecordError> {
        if index > self.steps.len() {
            return Err(RecordError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }

        self.validate_enchantments(&draft.enchantments)?;
        let (id, sequence) = self.next_id();
        let mut candidate = self.steps.clone();
        candidate.insert(index, EnchantmentStep::pending(id.clone(), draft));
        self.commit(candidate, index)?;

        self.next_sequence = sequence;
        tracing::info!(step = %id, index, "step inserted");
        Ok(id)
    }

    /// Replaces a step's entries and replays the ledger.
    pub fn update_step(
        &mut self,
        id: &StepId,
        enchantments: Vec<Enchantment>,
    ) -> Result<(), RecordError> {
        let index = self.require(id)?;
        self.validate_enchantments(&enchantments)?;

        let mut candidate = self.steps.clone();
        candidate[index].enchantments = enchantments;
        self.commit(candidate, index)?;

        tracing::info!(step = %id, index, "step updated");
        Ok(())
    }

    /// Toggles whether a step counts, and replays the ledger.
    pub fn set_step_ignored(&mut self, id: &StepId, ignored: bool) -> Result<(), RecordError> {
        let index = self.require(id)?;
        if self.steps[index].is_ignored == ignored {
            return Ok(());
        }

        let mut candidate = self.steps.clone();
        candidate[index].is_ignored = ignored;
        self.commit(candidate, index)?;

        tracing::info!(step = %id, ignored, "step ignore flag changed");
        Ok(())
    }

    /// Removes a step and replays the ledger. Returns the removed step as it
    /// was before removal.
    pub fn remove_step(&mut self, id: &StepId) -> Result<EnchantmentStep, RecordError> {
        let index = self.require(id)?;

        let mut candidate = self.steps.clone();
        let removed = candidate.remove(index);
        self.commit(candidate, index)?;

        tracing::info!(step = %id, index, "step removed");
        Ok(removed)
    }

    /// Moves a step to `new_index` and replays the ledger.
    pub fn move_step(&mut self, id: &StepId, new_index: usize) -> Result<(), RecordError> {
        let index = self.require(id)?;
        if new_index >= self.steps.len() {
            return Err(RecordError::IndexOutOfRange {
                index: new_index,
                len: self.steps.len(),
            });
        }
        if index == new_index {
            return Ok(());
        }

        let mut candidate = self.steps.clone();
        let step = candidate.remove(index);
        candidate.insert(new_index, step);
        self.commit(candidate, index.min(new_index))?;

        tracing::info!(step = %id, from = index, to = new_index, "step moved");
        Ok(())
    }

    /// Re-derives every step from the head of the ledger.
    pub fn recalculate_all(&mut self) -> Result<(), RecordError> {
        let mut candidate = self.steps.clone();
        replay_from(&mut candidate, 0, &self.config, self.catalog.as_ref())?;
        self.steps = candidate;
        self.stale = false;
        Ok(())
    }

    // ===== config setters =====
    //
    // Setters never replay. Those that feed step math mark the ledger stale.

    pub fn set_equipment_type(&mut self, equipment_type: EquipmentType) {
        if self.config.equipment_type != equipment_type {
            self.config.equipment_type = equipment_type;
            self.stale = true;
            tracing::debug!(%equipment_type, "record equipment type changed");
        }
    }

    /// Bounds only; does not mark the ledger stale.
    pub fn set_player_level(&mut self, level: u32) -> Result<(), RecordError> {
        self.update_config(false, |config| config.player_level = level)
    }

    pub fn set_equipment_potential(&mut self, potential: i64) -> Result<(), RecordError> {
        self.update_config(true, |config| config.equipment_potential = potential)
    }

    pub fn set_base_equipment_potential(&mut self, potential: i64) -> Result<(), RecordError> {
        self.update_config(true, |config| config.base_equipment_potential = potential)
    }

    pub fn set_smithing_level(&mut self, level: u32) -> Result<(), RecordError> {
        self.update_config(true, |config| config.smithing_level = level)
    }

    pub fn set_anvil_level(&mut self, level: u32) -> Result<(), RecordError> {
        self.update_config(false, |config| config.anvil_level = level)
    }

    pub fn set_understanding(&mut self, material: MaterialType, level: u8) -> Result<(), RecordError> {
        self.update_config(true, |config| config.understanding.set(material, level))
    }

    pub fn set_master_enhancement_level(&mut self, level: u8) -> Result<(), RecordError> {
        self.update_config(true, |config| config.master_enhancement_level = level)
    }

    /// Replaces the whole configuration.
    pub fn set_config(&mut self, config: RecordConfig) -> Result<(), RecordError> {
        self.update_config(true, |current| *current = config)
    }

    fn update_config(
        &mut self,
        affects_math: bool,
        edit: impl FnOnce(&mut RecordConfig),
    ) -> Result<(), RecordError> {
        let mut config = self.config.clone();
        edit(&mut config);
        config.validate()?;
        if config != self.config {
            self.config = config;
            self.stale |= affects_math;
            tracing::debug!(stale = self.stale, "record config changed");
        }
        Ok(())
    }

    // ===== internals =====

    fn require(&self, id: &StepId) -> Result<usize, RecordError> {
        self.position(id)
            .ok_or_else(|| RecordError::StepNotFound { step: id.clone() })
    }

    fn next_id(&self) -> (StepId, u64) {
        let mut sequence = self.next_sequence;
        loop {
            sequence += 1;
            let id = StepId::new(format!("step-{sequence}"));
            if self.position(&id).is_none() {
                return (id, sequence);
            }
        }
    }

    fn validate_enchantments(&self, enchantments: &[Enchantment]) -> Result<(), RecordError> {
        let mut seen = HashSet::new();
        for enchantment in enchantments {
            let property = &enchantment.property_id;
            if !self.catalog.contains(property) {
                return Err(RecordError::InvalidPropertyReference {
                    property: property.clone(),
                });
            }
            if !seen.insert(property) {
                return Err(RecordError::DuplicateProperty {
                    property: property.clone(),
                });
            }
            if enchantment.value.unsigned_abs() > Self::MAX_DELTA.unsigned_abs() {
                return Err(RecordError::InvalidDelta {
                    property: property.clone(),
                    value: i64::from(enchantment.value),
                });
            }
        }
        Ok(())
    }

    /// Checks the values a step leaves behind for the properties it edits.
    fn check_bounds(&self, step: &EnchantmentStep) -> Result<(), RecordError> {
        if step.is_ignored {
            return Ok(());
        }
        for enchantment in step.enchantments.iter().filter(|e| e.value != 0) {
            let property = &enchantment.property_id;
            let Some(definition) = self.catalog.definition(property) else {
                return Err(RecordError::InvalidPropertyReference {
                    property: property.clone(),
                });
            };
            let value = step
                .derived
                .current_properties
                .get(property)
                .copied()
                .unwrap_or(0);
            let bounds = definition.bounds(self.config.player_level);
            if !bounds.contains(i64::from(value)) {
                return Err(RecordError::ValueOutOfBounds {
                    step: step.id.clone(),
                    property: property.clone(),
                    value: i64::from(value),
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }

    /// Replays `candidate` and checks bounds of every step from `first_changed`
    /// on, since an edit shifts the values all later steps start from.
    fn commit(
        &mut self,
        mut candidate: Vec<EnchantmentStep>,
        first_changed: usize,
    ) -> Result<(), RecordError> {
        replay_from(&mut candidate, 0, &self.config, self.catalog.as_ref())?;
        for step in candidate.iter().skip(first_changed) {
            self.check_bounds(step)?;
        }
        self.steps = candidate;
        self.stale = false;
        Ok(())
    }
}
