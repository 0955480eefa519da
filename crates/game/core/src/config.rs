//! Record-level configuration and tunable limits.

use strum::{Display, EnumIter, EnumString};

use crate::catalog::MaterialType;
use crate::error::{EnchantError, ErrorSeverity};

/// Equipment being enchanted. Selects which double-potential flag applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EquipmentType {
    #[default]
    Weapon,
    Armor,
}

/// Per-material understanding skill levels. Each level cuts 1% off the
/// material cost of its material type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnderstandingSkills {
    pub metal: u8,
    pub cloth: u8,
    pub beast: u8,
    pub wood: u8,
    pub medicine: u8,
    pub mana: u8,
}

impl UnderstandingSkills {
    pub const fn uniform(level: u8) -> Self {
        Self {
            metal: level,
            cloth: level,
            beast: level,
            wood: level,
            medicine: level,
            mana: level,
        }
    }

    pub const fn level(&self, material: MaterialType) -> u8 {
        match material {
            MaterialType::Metal => self.metal,
            MaterialType::Cloth => self.cloth,
            MaterialType::Beast => self.beast,
            MaterialType::Wood => self.wood,
            MaterialType::Medicine => self.medicine,
            MaterialType::Mana => self.mana,
        }
    }

    pub fn set(&mut self, material: MaterialType, level: u8) {
        let slot = match material {
            MaterialType::Metal => &mut self.metal,
            MaterialType::Cloth => &mut self.cloth,
            MaterialType::Beast => &mut self.beast,
            MaterialType::Wood => &mut self.wood,
            MaterialType::Medicine => &mut self.medicine,
            MaterialType::Mana => &mut self.mana,
        };
        *slot = level;
    }
}

/// Configuration snapshot a record is created with.
///
/// Player level only drives attribute bounds; equipment type, potentials,
/// and skills feed directly into the step math, so changing them requires
/// replaying the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordConfig {
    pub equipment_type: EquipmentType,
    pub player_level: u32,

    /// Potential on the item before the first step.
    pub equipment_potential: i64,

    /// Floor used by the success formula once potential drops below it.
    pub base_equipment_potential: i64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub smithing_level: u32,

    /// Carried through snapshots; no step math depends on it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub anvil_level: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub understanding: UnderstandingSkills,

    #[cfg_attr(feature = "serde", serde(default))]
    pub master_enhancement_level: u8,
}

impl RecordConfig {
    // ===== limits =====
    pub const MIN_PLAYER_LEVEL: u32 = 200;
    pub const MAX_PLAYER_LEVEL: u32 = 400;
    pub const MAX_SMITHING_LEVEL: u32 = 300;
    pub const MAX_UNDERSTANDING_LEVEL: u8 = 100;
    pub const MASTER_ENHANCEMENT_MAX: u8 = 10;
    pub const MIN_BASE_POTENTIAL: i64 = 1;
    /// Magnitude limit on both potentials; keeps the step math inside `i64`.
    pub const MAX_POTENTIAL: i64 = 1_000_000_000;

    // ===== defaults =====
    pub const DEFAULT_POTENTIAL: i64 = 100;

    pub fn new(equipment_type: EquipmentType) -> Self {
        Self {
            equipment_type,
            player_level: Self::MIN_PLAYER_LEVEL,
            equipment_potential: Self::DEFAULT_POTENTIAL,
            base_equipment_potential: Self::DEFAULT_POTENTIAL,
            smithing_level: 0,
            anvil_level: 0,
            understanding: UnderstandingSkills::default(),
            master_enhancement_level: 0,
        }
    }

    #[must_use]
    pub fn with_player_level(mut self, level: u32) -> Self {
        self.player_level = level;
        self
    }

    /// Sets both the starting potential and the base potential floor.
    #[must_use]
    pub fn with_potential(mut self, potential: i64, base: i64) -> Self {
        self.equipment_potential = potential;
        self.base_equipment_potential = base;
        self
    }

    #[must_use]
    pub fn with_smithing_level(mut self, level: u32) -> Self {
        self.smithing_level = level;
        self
    }

    #[must_use]
    pub fn with_understanding(mut self, understanding: UnderstandingSkills) -> Self {
        self.understanding = understanding;
        self
    }

    #[must_use]
    pub fn with_master_enhancement(mut self, level: u8) -> Self {
        self.master_enhancement_level = level;
        self
    }

    /// Percentage cut from material layers by smithing proficiency.
    pub fn smithing_reduction_percent(&self) -> u32 {
        (self.smithing_level / 10 + self.smithing_level / 50).min(100)
    }

    /// Percentage cut from material layers of one type by its understanding skill.
    pub fn understanding_reduction_percent(&self, material: MaterialType) -> u32 {
        u32::from(self.understanding.level(material)).min(100)
    }

    /// Whether the first positive attribute is guaranteed in the expected rate.
    pub fn has_master_enhancement(&self) -> bool {
        self.master_enhancement_level >= Self::MASTER_ENHANCEMENT_MAX
    }

    /// Checks every field against the configured limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_PLAYER_LEVEL..=Self::MAX_PLAYER_LEVEL).contains(&self.player_level) {
            return Err(ConfigError::PlayerLevelOutOfRange {
                level: self.player_level,
            });
        }
        if self.base_equipment_potential < Self::MIN_BASE_POTENTIAL {
            return Err(ConfigError::BasePotentialTooLow {
                value: self.base_equipment_potential,
            });
        }
        if self.base_equipment_potential > Self::MAX_POTENTIAL {
            return Err(ConfigError::PotentialOutOfRange {
                field: "base_equipment_potential",
                value: self.base_equipment_potential,
            });
        }
        if !(-Self::MAX_POTENTIAL..=Self::MAX_POTENTIAL).contains(&self.equipment_potential) {
            return Err(ConfigError::PotentialOutOfRange {
                field: "equipment_potential",
                value: self.equipment_potential,
            });
        }
        if self.smithing_level > Self::MAX_SMITHING_LEVEL {
            return Err(ConfigError::SmithingLevelOutOfRange {
                level: self.smithing_level,
            });
        }
        for material in MaterialType::ALL {
            let level = self.understanding.level(material);
            if level > Self::MAX_UNDERSTANDING_LEVEL {
                return Err(ConfigError::UnderstandingOutOfRange { material, level });
            }
        }
        if self.master_enhancement_level > Self::MASTER_ENHANCEMENT_MAX {
            return Err(ConfigError::MasterEnhancementOutOfRange {
                level: self.master_enhancement_level,
            });
        }
        Ok(())
    }

    /// Clamps every field into range, returning the clamped config and a list
    /// of what changed.
    pub fn sanitized(&self) -> (Self, Vec<ConfigAdjustment>) {
        let mut config = self.clone();
        let mut adjustments = Vec::new();
        let mut clamp = |field: &'static str, from: i64, to: i64| {
            if from != to {
                adjustments.push(ConfigAdjustment { field, from, to });
            }
            to
        };

        config.player_level = clamp(
            "player_level",
            i64::from(self.player_level),
            i64::from(
                self.player_level
                    .clamp(Self::MIN_PLAYER_LEVEL, Self::MAX_PLAYER_LEVEL),
            ),
        ) as u32;
        config.equipment_potential = clamp(
            "equipment_potential",
            self.equipment_potential,
            self.equipment_potential
                .clamp(-Self::MAX_POTENTIAL, Self::MAX_POTENTIAL),
        );
        config.base_equipment_potential = clamp(
            "base_equipment_potential",
            self.base_equipment_potential,
            self.base_equipment_potential
                .clamp(Self::MIN_BASE_POTENTIAL, Self::MAX_POTENTIAL),
        );
        config.smithing_level = clamp(
            "smithing_level",
            i64::from(self.smithing_level),
            i64::from(self.smithing_level.min(Self::MAX_SMITHING_LEVEL)),
        ) as u32;
        for material in MaterialType::ALL {
            let level = self.understanding.level(material);
            let clamped = clamp(
                "understanding",
                i64::from(level),
                i64::from(level.min(Self::MAX_UNDERSTANDING_LEVEL)),
            );
            config.understanding.set(material, clamped as u8);
        }
        config.master_enhancement_level = clamp(
            "master_enhancement_level",
            i64::from(self.master_enhancement_level),
            i64::from(
                self.master_enhancement_level
                    .min(Self::MASTER_ENHANCEMENT_MAX),
            ),
        ) as u8;

        (config, adjustments)
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self::new(EquipmentType::default())
    }
}

/// A field changed by [`RecordConfig::sanitized`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigAdjustment {
    pub field: &'static str,
    pub from: i64,
    pub to: i64,
}

/// Out-of-range configuration values.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "player level {level} is outside {}..={}",
        RecordConfig::MIN_PLAYER_LEVEL,
        RecordConfig::MAX_PLAYER_LEVEL
    )]
    PlayerLevelOutOfRange { level: u32 },

    #[error(
        "base equipment potential {value} is below {}",
        RecordConfig::MIN_BASE_POTENTIAL
    )]
    BasePotentialTooLow { value: i64 },

    #[error(
        "{field} {value} is outside ±{}",
        RecordConfig::MAX_POTENTIAL
    )]
    PotentialOutOfRange { field: &'static str, value: i64 },

    #[error(
        "smithing level {level} exceeds {}",
        RecordConfig::MAX_SMITHING_LEVEL
    )]
    SmithingLevelOutOfRange { level: u32 },

    #[error(
        "{material} understanding level {level} exceeds {}",
        RecordConfig::MAX_UNDERSTANDING_LEVEL
    )]
    UnderstandingOutOfRange { material: MaterialType, level: u8 },

    #[error(
        "master enhancement level {level} exceeds {}",
        RecordConfig::MASTER_ENHANCEMENT_MAX
    )]
    MasterEnhancementOutOfRange { level: u8 },
}

impl EnchantError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ConfigError::*;
        match self {
            PlayerLevelOutOfRange { .. } => "CONFIG_PLAYER_LEVEL_OUT_OF_RANGE",
            BasePotentialTooLow { .. } => "CONFIG_BASE_POTENTIAL_TOO_LOW",
            PotentialOutOfRange { .. } => "CONFIG_POTENTIAL_OUT_OF_RANGE",
            SmithingLevelOutOfRange { .. } => "CONFIG_SMITHING_LEVEL_OUT_OF_RANGE",
            UnderstandingOutOfRange { .. } => "CONFIG_UNDERSTANDING_OUT_OF_RANGE",
            MasterEnhancementOutOfRange { .. } => "CONFIG_MASTER_ENHANCEMENT_OUT_OF_RANGE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smithing_reduction_combines_both_tiers() {
        let config = RecordConfig::default().with_smithing_level(250);
        // 250/10 + 250/50 = 25 + 5
        assert_eq!(config.smithing_reduction_percent(), 30);
        let config = RecordConfig::default().with_smithing_level(49);
        assert_eq!(config.smithing_reduction_percent(), 4);
    }

    #[test]
    fn validate_rejects_low_level_and_zero_base_potential() {
        let config = RecordConfig::default().with_player_level(150);
        assert_eq!(
            config.validate(),
            Err(ConfigError::PlayerLevelOutOfRange { level: 150 })
        );

        let config = RecordConfig::default().with_potential(50, 0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BasePotentialTooLow { value: 0 })
        );
        assert_eq!(
            config.validate().unwrap_err().error_code(),
            "CONFIG_BASE_POTENTIAL_TOO_LOW"
        );
    }

    #[test]
    fn sanitized_clamps_and_reports() {
        let mut skills = UnderstandingSkills::uniform(5);
        skills.mana = 200;
        let config = RecordConfig::default()
            .with_player_level(10)
            .with_potential(40, -3)
            .with_understanding(skills)
            .with_master_enhancement(99);

        let (clean, adjustments) = config.sanitized();
        assert!(clean.validate().is_ok());
        assert_eq!(clean.player_level, RecordConfig::MIN_PLAYER_LEVEL);
        assert_eq!(clean.base_equipment_potential, 1);
        assert_eq!(clean.understanding.mana, 100);
        assert_eq!(clean.understanding.metal, 5);
        assert_eq!(clean.master_enhancement_level, 10);
        assert_eq!(adjustments.len(), 4);
    }

    #[test]
    fn potentials_are_bounded_in_both_directions() {
        let huge = RecordConfig::default().with_potential(i64::MAX / 100, 100);
        assert_eq!(
            huge.validate(),
            Err(ConfigError::PotentialOutOfRange {
                field: "equipment_potential",
                value: i64::MAX / 100,
            })
        );
        let base = RecordConfig::default().with_potential(100, RecordConfig::MAX_POTENTIAL + 1);
        assert!(matches!(
            base.validate(),
            Err(ConfigError::PotentialOutOfRange {
                field: "base_equipment_potential",
                ..
            })
        ));

        let (clean, adjustments) = RecordConfig::default()
            .with_potential(9_000_000_000_000_000_000, i64::MAX)
            .sanitized();
        assert!(clean.validate().is_ok());
        assert_eq!(clean.equipment_potential, RecordConfig::MAX_POTENTIAL);
        assert_eq!(clean.base_equipment_potential, RecordConfig::MAX_POTENTIAL);
        assert_eq!(adjustments.len(), 2);
    }

    #[test]
    fn master_enhancement_only_at_max_tier() {
        assert!(!RecordConfig::default().with_master_enhancement(9).has_master_enhancement());
        assert!(RecordConfig::default().with_master_enhancement(10).has_master_enhancement());
    }
}
