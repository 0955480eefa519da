//! `catalog`: list property definitions.

use anyhow::Result;
use clap::Parser;
use console::style;
use enchant_core::{EnchantCategory, PropertyDefinition, RecordConfig};

use super::Session;

/// List catalog properties
#[derive(Parser, Debug)]
pub struct CatalogCmd {
    /// Only list one category (e.g. `stats`, `critical`)
    #[arg(long)]
    pub category: Option<EnchantCategory>,

    /// Player level used to show value caps
    #[arg(long, default_value_t = RecordConfig::MIN_PLAYER_LEVEL)]
    pub level: u32,
}

impl CatalogCmd {
    pub fn execute(self, session: &Session) -> Result<()> {
        let definitions: Vec<&PropertyDefinition> = match self.category {
            Some(category) => session.catalog.by_category(category).collect(),
            None => session.catalog.iter().collect(),
        };

        if definitions.is_empty() {
            println!("{}", style("No properties found").yellow());
            return Ok(());
        }

        println!(
            "{}",
            style(format!("{:<18} {:<22} {:<11} {:>4} {:>5} {:<9} {:>7} {:>9}",
                "ID", "NAME", "CATEGORY", "COST", "THR", "MATERIAL", "MAT", "RANGE"))
            .bold()
        );
        for definition in definitions {
            println!("{}", format_row(definition, self.level));
        }
        Ok(())
    }
}

fn format_row(definition: &PropertyDefinition, level: u32) -> String {
    let threshold = definition
        .attenuation_threshold
        .map_or_else(|| "-".to_owned(), |t| t.to_string());
    let bounds = definition.bounds(level);
    let mut flags = String::new();
    if definition.weapon_double_potential {
        flags.push_str(" 2×weapon");
    }
    if definition.armor_double_potential {
        flags.push_str(" 2×armor");
    }
    format!(
        "{:<18} {:<22} {:<11} {:>4} {:>5} {:<9} {:>7} {:>9}{}",
        definition.id.as_str(),
        definition.name,
        definition.category.as_ref(),
        definition.potential_cost,
        threshold,
        definition.material.as_ref(),
        definition.material_cost.to_string(),
        format!("{}..{}", bounds.min, bounds.max),
        flags
    )
}

#[cfg(test)]
mod tests {
    use enchant_core::{Hundredths, MaterialType};

    use super::*;

    #[test]
    fn row_shows_threshold_and_flags() {
        let definition = PropertyDefinition::new(
            "atk",
            "ATK",
            EnchantCategory::Attack,
            3,
            MaterialType::Metal,
            Hundredths::from_int(1),
        )
        .with_threshold(20)
        .with_double_potential(false, true)
        .with_negative();

        let row = format_row(&definition, 200);
        assert!(row.starts_with("atk "));
        assert!(row.contains(" 20 "));
        assert!(row.contains("1.00"));
        assert!(row.contains("-100..100"));
        assert!(row.ends_with("2×armor"));
    }
}
