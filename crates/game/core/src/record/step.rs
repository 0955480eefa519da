//! Ledger step types.

use std::collections::{BTreeMap, BTreeSet};
use core::fmt;

use crate::calc::MaterialCosts;
use crate::catalog::PropertyId;
use crate::fixed::Hundredths;

/// Opaque step identity, stable across edits and replays.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw `(property, delta)` entry of a step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enchantment {
    pub property_id: PropertyId,
    pub value: i32,
}

impl Enchantment {
    pub fn new(property_id: impl Into<PropertyId>, value: i32) -> Self {
        Self {
            property_id: property_id.into(),
            value,
        }
    }
}

impl fmt::Display for Enchantment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:+}", self.property_id, self.value)
    }
}

/// Caller input for a new step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepDraft {
    pub enchantments: Vec<Enchantment>,
    pub is_ignored: bool,
}

impl StepDraft {
    pub fn new(enchantments: impl IntoIterator<Item = Enchantment>) -> Self {
        Self {
            enchantments: enchantments.into_iter().collect(),
            is_ignored: false,
        }
    }

    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.is_ignored = true;
        self
    }
}

/// Everything the engine derives for a step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStep {
    /// Attribute values after this step.
    pub current_properties: BTreeMap<PropertyId, i32>,
    /// Attributes touched by a non-zero delta up to and including this step.
    pub enchanted_properties: BTreeSet<PropertyId>,
    pub material_costs: MaterialCosts,
    pub total_material_costs: MaterialCosts,
    pub pre_enchantment_potential: i64,
    pub post_enchantment_potential: i64,
    pub potential_change: i64,
    pub multiplier: Hundredths,
    pub property_potential_changes: BTreeMap<PropertyId, Hundredths>,
    pub single_success_rate: i64,
    pub expected_success_rate: Hundredths,
}

/// One ledger entry: raw input plus its derived bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnchantmentStep {
    pub(crate) id: StepId,
    pub(crate) enchantments: Vec<Enchantment>,
    pub(crate) is_ignored: bool,
    pub(crate) derived: DerivedStep,
}

impl EnchantmentStep {
    pub(crate) fn pending(id: StepId, draft: StepDraft) -> Self {
        Self {
            id,
            enchantments: draft.enchantments,
            is_ignored: draft.is_ignored,
            derived: DerivedStep::default(),
        }
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn enchantments(&self) -> &[Enchantment] {
        &self.enchantments
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    pub fn derived(&self) -> &DerivedStep {
        &self.derived
    }
}

impl fmt::Display for EnchantmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, enchantment) in self.enchantments.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{enchantment}")?;
        }
        if self.is_ignored {
            f.write_str(" (ignored)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_display_lists_signed_deltas() {
        let step = EnchantmentStep::pending(
            StepId::from("step-1"),
            StepDraft::new([Enchantment::new("str", 5), Enchantment::new("dex", -3)]).ignored(),
        );
        assert_eq!(step.to_string(), "str +5, dex -3 (ignored)");
    }
}
