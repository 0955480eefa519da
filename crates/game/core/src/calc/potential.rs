//! Potential cost and refund of attribute changes.
//!
//! Increases spend potential, decreases refund part of it. Both follow the
//! property's attenuation threshold, and the step aggregate is scaled by the
//! synergy multiplier of every property touched so far in the record.

use std::collections::{BTreeMap, BTreeSet};

use super::AttributeChange;
use crate::catalog::{EnchantCategory, PropertyDefinition, PropertyId, PropertyOracle};
use crate::config::EquipmentType;
use crate::fixed::Hundredths;

/// Refund rate for decreases, per mille (0.305).
pub const REFUND_PER_MILLE: i64 = 305;

/// Multiplier bonus per squared group size, in hundredths (0.05).
pub const SYNERGY_STEP: i64 = 5;

fn double_factor(definition: &PropertyDefinition, equipment: EquipmentType) -> i64 {
    if definition.is_double_potential(equipment) {
        2
    } else {
        1
    }
}

/// Potential spent raising a property from `pre` to `post` (`post > pre`).
///
/// Units at or below the attenuation threshold cost the base rate, units
/// above it cost double.
///
/// ```
/// # use enchant_core::catalog::*;
/// # use enchant_core::{EquipmentType, Hundredths};
/// # use enchant_core::calc::increase_cost;
/// let def = PropertyDefinition::new("x", "X", EnchantCategory::Stats, 10,
///     MaterialType::Beast, Hundredths::from_int(1))
///     .with_threshold(5)
///     .with_double_potential(true, false);
/// // (5 × 10 + 3 × 10 × 2) × 2
/// assert_eq!(increase_cost(&def, 0, 8, EquipmentType::Weapon), 220);
/// ```
pub fn increase_cost(
    definition: &PropertyDefinition,
    pre: i32,
    post: i32,
    equipment: EquipmentType,
) -> i64 {
    let (pre, post) = (i64::from(pre), i64::from(post));
    if post <= pre {
        return 0;
    }

    let total = post - pre;
    let above = match definition.attenuation_threshold {
        Some(threshold) => (post - pre.max(i64::from(threshold))).max(0),
        None => 0,
    };
    let below = total - above;

    (below + 2 * above) * i64::from(definition.potential_cost) * double_factor(definition, equipment)
}

/// Potential refunded lowering a property from `pre` to `post` (`post < pre`).
///
/// Mirrors [`increase_cost`] around the negative threshold: units past it
/// refund at half rate. The result is scaled by 0.305 and truncated.
pub fn decrease_refund(
    definition: &PropertyDefinition,
    pre: i32,
    post: i32,
    equipment: EquipmentType,
) -> i64 {
    let (pre, post) = (i64::from(pre), i64::from(post));
    if post >= pre {
        return 0;
    }

    let total = pre - post;
    let beyond = match definition.attenuation_threshold {
        Some(threshold) => (pre.min(-i64::from(threshold)) - post).max(0),
        None => 0,
    };
    let full = total - beyond;

    // Counted in half units so the 0.5 rate stays integral.
    let half_units = 2 * full + beyond;
    half_units
        * i64::from(definition.potential_cost)
        * REFUND_PER_MILLE
        * double_factor(definition, equipment)
        / 2000
}

/// Signed potential delta of one property change: negative when spending,
/// positive when refunding.
pub fn property_potential_delta(
    definition: &PropertyDefinition,
    pre: i32,
    post: i32,
    equipment: EquipmentType,
) -> i64 {
    match post.cmp(&pre) {
        core::cmp::Ordering::Greater => -increase_cost(definition, pre, post, equipment),
        core::cmp::Ordering::Less => decrease_refund(definition, pre, post, equipment),
        core::cmp::Ordering::Equal => 0,
    }
}

/// Synergy multiplier over every property touched so far.
///
/// Starts at 1; each category with at least two touched properties adds
/// `0.05 × size²`. Ids unknown to the oracle are ignored.
pub fn synergy_multiplier<O>(touched: &BTreeSet<PropertyId>, oracle: &O) -> Hundredths
where
    O: PropertyOracle + ?Sized,
{
    let mut groups: BTreeMap<EnchantCategory, i64> = BTreeMap::new();
    for id in touched {
        if let Some(definition) = oracle.definition(id) {
            *groups.entry(definition.category).or_default() += 1;
        }
    }

    let bonus: i64 = groups
        .values()
        .filter(|&&size| size >= 2)
        .map(|&size| SYNERGY_STEP * size * size)
        .sum();

    Hundredths::from_raw(Hundredths::ONE.raw() + bonus)
}

/// Potential outcome of one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepPotential {
    pub post_enchantment_potential: i64,
    pub potential_change: i64,
    pub multiplier: Hundredths,
    /// Per-property delta after the multiplier, for display.
    pub property_changes: BTreeMap<PropertyId, Hundredths>,
    /// Touched set including this step, for the next step.
    pub touched: BTreeSet<PropertyId>,
}

/// Computes the potential outcome of a step.
///
/// `previously_touched` is the touched set before this step; every change
/// with a non-zero delta joins it before the multiplier is evaluated.
/// Returns `None` if the running potential leaves the `i64` range.
pub fn calculate_step_potential<O>(
    changes: &[AttributeChange<'_>],
    previously_touched: &BTreeSet<PropertyId>,
    pre_potential: i64,
    equipment: EquipmentType,
    oracle: &O,
) -> Option<StepPotential>
where
    O: PropertyOracle + ?Sized,
{
    let mut touched = previously_touched.clone();
    touched.extend(
        changes
            .iter()
            .filter(|change| !change.is_noop())
            .map(|change| change.definition.id.clone()),
    );
    let multiplier = synergy_multiplier(&touched, oracle);

    let mut aggregate = 0i64;
    let mut property_changes = BTreeMap::new();
    for change in changes.iter().filter(|change| !change.is_noop()) {
        let delta = property_potential_delta(change.definition, change.pre, change.post, equipment);
        aggregate = aggregate.checked_add(delta)?;
        property_changes.insert(change.definition.id.clone(), multiplier.scale(delta));
    }

    let potential_change = multiplier.scale_trunc(aggregate);

    Some(StepPotential {
        post_enchantment_potential: pre_potential.checked_add(potential_change)?,
        potential_change,
        multiplier,
        property_changes,
        touched,
    })
}
