//! Layered material cost.
//!
//! Moving a property between adjacent levels `L-1` and `L` (either way) costs
//! `layer_cost(L)`, where `L` is the distance from zero. A move that crosses
//! zero is split into `pre → 0` and `0 → post`, each summed on its own.

use core::ops::{Add, AddAssign};

use super::AttributeChange;
use crate::catalog::MaterialType;
use crate::config::RecordConfig;
use crate::fixed::Hundredths;

/// Material amounts per material type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialCosts {
    pub metal: u64,
    pub cloth: u64,
    pub beast: u64,
    pub wood: u64,
    pub medicine: u64,
    pub mana: u64,
}

impl MaterialCosts {
    pub const fn get(&self, material: MaterialType) -> u64 {
        match material {
            MaterialType::Metal => self.metal,
            MaterialType::Cloth => self.cloth,
            MaterialType::Beast => self.beast,
            MaterialType::Wood => self.wood,
            MaterialType::Medicine => self.medicine,
            MaterialType::Mana => self.mana,
        }
    }

    pub fn credit(&mut self, material: MaterialType, amount: u64) {
        let slot = match material {
            MaterialType::Metal => &mut self.metal,
            MaterialType::Cloth => &mut self.cloth,
            MaterialType::Beast => &mut self.beast,
            MaterialType::Wood => &mut self.wood,
            MaterialType::Medicine => &mut self.medicine,
            MaterialType::Mana => &mut self.mana,
        };
        *slot += amount;
    }

    /// Amounts in canonical material order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialType, u64)> + '_ {
        MaterialType::ALL
            .into_iter()
            .map(move |material| (material, self.get(material)))
    }

    pub fn total(&self) -> u64 {
        self.iter().map(|(_, amount)| amount).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for MaterialCosts {
    fn add_assign(&mut self, rhs: Self) {
        for (material, amount) in rhs.iter() {
            self.credit(material, amount);
        }
    }
}

impl Add for MaterialCosts {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

/// Cost of crossing one layer at absolute level `layer`.
///
/// `floor(base × layer²)`, then the understanding cut, then the smithing cut,
/// each truncated on its own.
///
/// ```
/// # use enchant_core::Hundredths;
/// # use enchant_core::calc::layer_cost;
/// assert_eq!(layer_cost(Hundredths::from_int(4), 5, 0, 0), 100);
/// assert_eq!(layer_cost(Hundredths::from_int(4), 5, 10, 30), 63); // 100 → 90 → 63
/// ```
pub fn layer_cost(
    material_cost: Hundredths,
    layer: u32,
    understanding_percent: u32,
    smithing_percent: u32,
) -> u64 {
    let layer = u64::from(layer);
    let base = material_cost.raw().max(0) as u64;
    let raw = base * layer * layer / 100;
    let understood = raw * u64::from(100 - understanding_percent.min(100)) / 100;
    understood * u64::from(100 - smithing_percent.min(100)) / 100
}

fn segment_cost(from: u32, to: u32, cost_of: impl Fn(u32) -> u64) -> u64 {
    let (low, high) = if from <= to { (from, to) } else { (to, from) };
    (low + 1..=high).map(cost_of).sum()
}

/// Material cost of moving one property from `pre` to `post`.
pub fn attribute_material_cost(change: &AttributeChange<'_>, config: &RecordConfig) -> u64 {
    let (pre, post) = (change.pre, change.post);
    if pre == post {
        return 0;
    }

    let definition = change.definition;
    let understanding = config.understanding_reduction_percent(definition.material);
    let smithing = config.smithing_reduction_percent();
    let cost_of = |layer| layer_cost(definition.material_cost, layer, understanding, smithing);

    let same_side = (pre >= 0 && post >= 0) || (pre <= 0 && post <= 0);
    if same_side {
        segment_cost(pre.unsigned_abs(), post.unsigned_abs(), cost_of)
    } else {
        segment_cost(pre.unsigned_abs(), 0, cost_of) + segment_cost(0, post.unsigned_abs(), cost_of)
    }
}

/// Material cost of every change in a step, grouped by material type.
pub fn step_material_costs(changes: &[AttributeChange<'_>], config: &RecordConfig) -> MaterialCosts {
    let mut costs = MaterialCosts::default();
    for change in changes {
        costs.credit(
            change.definition.material,
            attribute_material_cost(change, config),
        );
    }
    costs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnchantCategory, PropertyDefinition};
    use crate::config::UnderstandingSkills;

    fn def(material: MaterialType, cost: Hundredths) -> PropertyDefinition {
        PropertyDefinition::new("p", "P", EnchantCategory::Stats, 10, material, cost).with_negative()
    }

    #[test]
    fn example_layers_three_to_five() {
        let d = def(MaterialType::Metal, Hundredths::from_int(4));
        let config = RecordConfig::default();
        // 36 + 64 + 100
        assert_eq!(
            attribute_material_cost(&AttributeChange::new(&d, 2, 5), &config),
            200
        );
        // Reverse direction crosses the same layers.
        assert_eq!(
            attribute_material_cost(&AttributeChange::new(&d, 5, 2), &config),
            200
        );
        assert_eq!(
            attribute_material_cost(&AttributeChange::new(&d, -2, -5), &config),
            200
        );
    }

    #[test]
    fn crossing_zero_splits_traversal() {
        let d = def(MaterialType::Metal, Hundredths::from_int(4));
        let config = RecordConfig::default();
        // 3 → 0: layers 3,2,1 = 36 + 16 + 4; 0 → -2: layers 1,2 = 4 + 16
        assert_eq!(
            attribute_material_cost(&AttributeChange::new(&d, 3, -2), &config),
            76
        );
    }

    #[test]
    fn fractional_base_cost_floors_each_layer() {
        let d = def(MaterialType::Cloth, Hundredths::from_f64(2.5));
        let config = RecordConfig::default();
        // floor(2.5) + floor(10) + floor(22.5) = 2 + 10 + 22
        assert_eq!(
            attribute_material_cost(&AttributeChange::new(&d, 0, 3), &config),
            34
        );
    }

    #[test]
    fn reductions_apply_in_order_and_truncate_separately() {
        // raw 36 → understanding 5%: floor(34.2) = 34 → smithing 4%: floor(32.64) = 32
        assert_eq!(layer_cost(Hundredths::from_int(4), 3, 5, 4), 32);
        // Caps at 100%.
        assert_eq!(layer_cost(Hundredths::from_int(4), 3, 250, 0), 0);
    }

    #[test]
    fn step_costs_group_by_material() {
        let metal = def(MaterialType::Metal, Hundredths::from_int(4));
        let mana = def(MaterialType::Mana, Hundredths::from_int(1));
        let mut skills = UnderstandingSkills::default();
        skills.mana = 50;
        let config = RecordConfig::default().with_understanding(skills);

        let costs = step_material_costs(
            &[
                AttributeChange::new(&metal, 0, 2),
                AttributeChange::new(&mana, 0, 4),
            ],
            &config,
        );
        assert_eq!(costs.metal, 4 + 16);
        // 1,4,9,16 halved and floored: 0 + 2 + 4 + 8
        assert_eq!(costs.mana, 14);
        assert_eq!(costs.total(), 34);
        assert_eq!(costs.get(MaterialType::Beast), 0);
    }

    #[test]
    fn totals_add_per_material() {
        let mut a = MaterialCosts::default();
        a.credit(MaterialType::Wood, 5);
        let mut b = MaterialCosts::default();
        b.credit(MaterialType::Wood, 7);
        b.credit(MaterialType::Medicine, 1);
        let sum = a + b;
        assert_eq!(sum.wood, 12);
        assert_eq!(sum.medicine, 1);
        assert!(!sum.is_zero());
    }
}
