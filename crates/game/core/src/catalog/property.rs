use core::borrow::Borrow;
use core::fmt;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::EquipmentType;
use crate::fixed::Hundredths;

/// Stable identifier of a property in the catalog (e.g. `"str"`, `"critical_rate"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PropertyId(String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PropertyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for PropertyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enchant-type category. Properties of the same category share a synergy group.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnchantCategory {
    Stats,
    Attack,
    Magic,
    Defense,
    Resistance,
    Vitality,
    Accuracy,
    Evasion,
    Speed,
    Critical,
    Element,
    Special,
}

/// Consumable material kind. Each kind has a matching understanding skill.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaterialType {
    Metal,
    Cloth,
    Beast,
    Wood,
    Medicine,
    Mana,
}

impl MaterialType {
    /// All material types in canonical order.
    pub const ALL: [MaterialType; 6] = [
        MaterialType::Metal,
        MaterialType::Cloth,
        MaterialType::Beast,
        MaterialType::Wood,
        MaterialType::Medicine,
        MaterialType::Mana,
    ];

    /// Position in [`MaterialType::ALL`].
    pub const fn index(self) -> usize {
        match self {
            MaterialType::Metal => 0,
            MaterialType::Cloth => 1,
            MaterialType::Beast => 2,
            MaterialType::Wood => 3,
            MaterialType::Medicine => 4,
            MaterialType::Mana => 5,
        }
    }
}

/// Level-scaled cap on the absolute value of a property.
///
/// `max = base + player_level / levels_per_point`; a `levels_per_point` of zero
/// means the cap does not scale with level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueCap {
    pub base: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels_per_point: u32,
}

impl ValueCap {
    pub const fn fixed(base: i32) -> Self {
        Self {
            base,
            levels_per_point: 0,
        }
    }

    pub const fn scaled(base: i32, levels_per_point: u32) -> Self {
        Self {
            base,
            levels_per_point,
        }
    }

    pub fn max_at(&self, player_level: u32) -> i32 {
        if self.levels_per_point == 0 {
            return self.base;
        }
        let scaled = (player_level / self.levels_per_point) as i32;
        self.base.saturating_add(scaled)
    }
}

/// Inclusive value range a property may take at a given player level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueBounds {
    pub min: i32,
    pub max: i32,
}

impl ValueBounds {
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.min as i64 && value <= self.max as i64
    }
}

/// Immutable definition of one enchantable property.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyDefinition {
    pub id: PropertyId,
    pub name: String,
    pub category: EnchantCategory,

    /// Potential spent per unit increase below the attenuation threshold.
    pub potential_cost: u32,

    /// Absolute value past which the cost curve changes. `None` disables attenuation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attenuation_threshold: Option<u32>,

    /// UI step size while `|value|` is below the threshold.
    #[cfg_attr(feature = "serde", serde(default = "default_increment"))]
    pub increment_below: u32,

    /// UI step size once `|value|` reaches the threshold.
    #[cfg_attr(feature = "serde", serde(default = "default_increment"))]
    pub increment_above: u32,

    pub material: MaterialType,
    pub material_cost: Hundredths,

    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon_double_potential: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor_double_potential: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub negative_possible: bool,

    pub cap: ValueCap,
}

#[cfg(feature = "serde")]
fn default_increment() -> u32 {
    1
}

impl PropertyDefinition {
    /// Creates a definition with no threshold, no double-potential flags,
    /// unit increments, positive values only, and a fixed cap of 100.
    pub fn new(
        id: impl Into<PropertyId>,
        name: impl Into<String>,
        category: EnchantCategory,
        potential_cost: u32,
        material: MaterialType,
        material_cost: Hundredths,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            potential_cost,
            attenuation_threshold: None,
            increment_below: 1,
            increment_above: 1,
            material,
            material_cost,
            weapon_double_potential: false,
            armor_double_potential: false,
            negative_possible: false,
            cap: ValueCap::fixed(100),
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.attenuation_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_double_potential(mut self, weapon: bool, armor: bool) -> Self {
        self.weapon_double_potential = weapon;
        self.armor_double_potential = armor;
        self
    }

    #[must_use]
    pub fn with_negative(mut self) -> Self {
        self.negative_possible = true;
        self
    }

    #[must_use]
    pub fn with_cap(mut self, cap: ValueCap) -> Self {
        self.cap = cap;
        self
    }

    #[must_use]
    pub fn with_increments(mut self, below: u32, above: u32) -> Self {
        self.increment_below = below;
        self.increment_above = above;
        self
    }

    /// Whether potential costs and refunds are doubled on this equipment.
    pub fn is_double_potential(&self, equipment: EquipmentType) -> bool {
        match equipment {
            EquipmentType::Weapon => self.weapon_double_potential,
            EquipmentType::Armor => self.armor_double_potential,
        }
    }

    /// Step size to use when editing a property currently at `value`.
    pub fn increment_at(&self, value: i32) -> u32 {
        match self.attenuation_threshold {
            Some(threshold) if value.unsigned_abs() >= threshold => self.increment_above,
            _ => self.increment_below,
        }
    }

    /// Allowed value range for a player level.
    pub fn bounds(&self, player_level: u32) -> ValueBounds {
        let max = self.cap.max_at(player_level).max(0);
        let min = if self.negative_possible { -max } else { 0 };
        ValueBounds { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn critical() -> PropertyDefinition {
        PropertyDefinition::new(
            "critical_rate",
            "Critical Rate",
            EnchantCategory::Critical,
            1,
            MaterialType::Mana,
            Hundredths::from_int(1),
        )
        .with_threshold(20)
        .with_increments(1, 2)
        .with_cap(ValueCap::scaled(2, 10))
        .with_negative()
    }

    #[test]
    fn increment_switches_at_threshold() {
        let def = critical();
        assert_eq!(def.increment_at(19), 1);
        assert_eq!(def.increment_at(20), 2);
        assert_eq!(def.increment_at(-25), 2);
    }

    #[test]
    fn bounds_scale_with_level() {
        let def = critical();
        assert_eq!(def.bounds(200), ValueBounds { min: -22, max: 22 });
        assert_eq!(def.bounds(255), ValueBounds { min: -27, max: 27 });
        assert!(def.bounds(200).contains(-22));
        assert!(!def.bounds(200).contains(23));
    }

    #[test]
    fn positive_only_properties_floor_at_zero() {
        let def = PropertyDefinition::new(
            "atk",
            "ATK",
            EnchantCategory::Attack,
            3,
            MaterialType::Metal,
            Hundredths::from_int(3),
        )
        .with_cap(ValueCap::fixed(15));
        assert_eq!(def.bounds(300), ValueBounds { min: 0, max: 15 });
    }

    #[test]
    fn double_potential_follows_equipment() {
        let def = critical().with_double_potential(true, false);
        assert!(def.is_double_potential(EquipmentType::Weapon));
        assert!(!def.is_double_potential(EquipmentType::Armor));
    }

    #[test]
    fn category_parses_snake_case() {
        use core::str::FromStr;
        assert_eq!(EnchantCategory::from_str("critical").ok(), Some(EnchantCategory::Critical));
        assert_eq!(MaterialType::Medicine.to_string(), "medicine");
        assert_eq!(MaterialType::ALL[MaterialType::Wood.index()], MaterialType::Wood);
    }
}
