//! Step derivation and ledger replay.
//!
//! A step only depends on the running state left by its predecessor
//! ([`LedgerCursor`]), so replaying from any index reproduces a full replay
//! as long as the predecessor's derived bundle is current.

use std::collections::{BTreeMap, BTreeSet};

use super::{DerivedStep, Enchantment, EnchantmentStep, RecordError};
use crate::calc::{
    self, AttributeChange, MaterialCosts, expected_success_rate, single_success_rate,
};
use crate::catalog::{PropertyId, PropertyOracle};
use crate::config::RecordConfig;

/// Running state between two steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LedgerCursor {
    properties: BTreeMap<PropertyId, i32>,
    touched: BTreeSet<PropertyId>,
    potential: i64,
    totals: MaterialCosts,
}

impl LedgerCursor {
    /// State before the first step: all-zero attributes, starting potential.
    pub(crate) fn start(config: &RecordConfig) -> Self {
        Self {
            potential: config.equipment_potential,
            ..Self::default()
        }
    }

    /// State left behind by a derived step.
    pub(crate) fn after(derived: &DerivedStep) -> Self {
        Self {
            properties: derived.current_properties.clone(),
            touched: derived.enchanted_properties.clone(),
            potential: derived.post_enchantment_potential,
            totals: derived.total_material_costs,
        }
    }

    /// State before step `index` of `steps`.
    pub(crate) fn before(steps: &[EnchantmentStep], index: usize, config: &RecordConfig) -> Self {
        match index.checked_sub(1).and_then(|previous| steps.get(previous)) {
            Some(previous) => Self::after(&previous.derived),
            None => Self::start(config),
        }
    }
}

fn overflow(potential: i64) -> RecordError {
    RecordError::PotentialOverflow { potential }
}

fn carried(
    cursor: &LedgerCursor,
    config: &RecordConfig,
    oracle: &dyn PropertyOracle,
) -> Result<DerivedStep, RecordError> {
    let single =
        single_success_rate(cursor.potential, cursor.potential, config.base_equipment_potential)
            .ok_or_else(|| overflow(cursor.potential))?;
    Ok(DerivedStep {
        current_properties: cursor.properties.clone(),
        enchanted_properties: cursor.touched.clone(),
        material_costs: MaterialCosts::default(),
        total_material_costs: cursor.totals,
        pre_enchantment_potential: cursor.potential,
        post_enchantment_potential: cursor.potential,
        potential_change: 0,
        multiplier: calc::synergy_multiplier(&cursor.touched, oracle),
        property_potential_changes: BTreeMap::new(),
        single_success_rate: single,
        expected_success_rate: expected_success_rate(
            cursor.properties.values().copied(),
            single,
            config.has_master_enhancement(),
        ),
    })
}

/// Derives one step from the state left by its predecessor.
///
/// Ignored steps carry the cursor forward untouched. Entries are applied in
/// order against a running snapshot, so each entry's `pre` value already
/// reflects earlier entries of the same step.
pub(crate) fn derive_step(
    enchantments: &[Enchantment],
    is_ignored: bool,
    cursor: &LedgerCursor,
    config: &RecordConfig,
    oracle: &dyn PropertyOracle,
) -> Result<DerivedStep, RecordError> {
    if is_ignored {
        return carried(cursor, config, oracle);
    }

    let mut properties = cursor.properties.clone();
    let mut changes = Vec::with_capacity(enchantments.len());
    for enchantment in enchantments {
        let definition = oracle.definition(&enchantment.property_id).ok_or_else(|| {
            RecordError::InvalidPropertyReference {
                property: enchantment.property_id.clone(),
            }
        })?;
        let pre = properties
            .get(&enchantment.property_id)
            .copied()
            .unwrap_or(0);
        let post = pre
            .checked_add(enchantment.value)
            .ok_or_else(|| RecordError::InvalidDelta {
                property: enchantment.property_id.clone(),
                value: i64::from(enchantment.value),
            })?;
        if enchantment.value != 0 {
            properties.insert(enchantment.property_id.clone(), post);
        }
        changes.push(AttributeChange::new(definition, pre, post));
    }

    let potential = calc::calculate_step_potential(
        &changes,
        &cursor.touched,
        cursor.potential,
        config.equipment_type,
        oracle,
    )
    .ok_or_else(|| overflow(cursor.potential))?;
    let material_costs = calc::step_material_costs(&changes, config);
    let single = single_success_rate(
        cursor.potential,
        potential.post_enchantment_potential,
        config.base_equipment_potential,
    )
    .ok_or_else(|| overflow(potential.post_enchantment_potential))?;
    let expected = expected_success_rate(
        properties.values().copied(),
        single,
        config.has_master_enhancement(),
    );

    Ok(DerivedStep {
        current_properties: properties,
        enchanted_properties: potential.touched,
        material_costs,
        total_material_costs: cursor.totals + material_costs,
        pre_enchantment_potential: cursor.potential,
        post_enchantment_potential: potential.post_enchantment_potential,
        potential_change: potential.potential_change,
        multiplier: potential.multiplier,
        property_potential_changes: potential.property_changes,
        single_success_rate: single,
        expected_success_rate: expected,
    })
}

/// Re-derives `steps[from..]` in place.
pub(crate) fn replay_from(
    steps: &mut [EnchantmentStep],
    from: usize,
    config: &RecordConfig,
    oracle: &dyn PropertyOracle,
) -> Result<(), RecordError> {
    let mut cursor = LedgerCursor::before(steps, from, config);
    for step in steps.iter_mut().skip(from) {
        let derived = derive_step(&step.enchantments, step.is_ignored, &cursor, config, oracle)?;
        cursor = LedgerCursor::after(&derived);
        step.derived = derived;
    }
    tracing::debug!(from, steps = steps.len(), "ledger replayed");
    Ok(())
}
