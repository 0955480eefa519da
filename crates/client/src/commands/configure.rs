//! `configure`: change record configuration and replay.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use enchant_core::{EquipmentType, MaterialType};

use super::show::print_summary;
use super::{Session, parse_understanding, require_file};

/// Change record configuration and replay the ledger
#[derive(Parser, Debug)]
pub struct Configure {
    /// Record JSON file
    pub record: PathBuf,

    /// Equipment type (weapon or armor)
    #[arg(long)]
    pub equipment: Option<EquipmentType>,

    /// Player level
    #[arg(long)]
    pub level: Option<u32>,

    /// Starting equipment potential
    #[arg(long, allow_hyphen_values = true)]
    pub potential: Option<i64>,

    /// Base equipment potential used by the success formula
    #[arg(long)]
    pub base_potential: Option<i64>,

    /// Smithing proficiency level
    #[arg(long)]
    pub smithing: Option<u32>,

    /// Anvil level
    #[arg(long)]
    pub anvil: Option<u32>,

    /// Understanding skill as MATERIAL=LEVEL (repeatable)
    #[arg(long, value_parser = parse_understanding)]
    pub understanding: Vec<(MaterialType, u8)>,

    /// Master enhancement tier
    #[arg(long)]
    pub master: Option<u8>,
}

impl Configure {
    pub fn execute(self, session: &Session) -> Result<()> {
        require_file(&self.record)?;
        let mut record = session.load_record(&self.record)?;

        if let Some(equipment) = self.equipment {
            record.set_equipment_type(equipment);
        }
        if let Some(level) = self.level {
            record.set_player_level(level)?;
        }
        if let Some(potential) = self.potential {
            record.set_equipment_potential(potential)?;
        }
        if let Some(potential) = self.base_potential {
            record.set_base_equipment_potential(potential)?;
        }
        if let Some(level) = self.smithing {
            record.set_smithing_level(level)?;
        }
        if let Some(level) = self.anvil {
            record.set_anvil_level(level)?;
        }
        for (material, level) in self.understanding {
            record.set_understanding(material, level)?;
        }
        if let Some(level) = self.master {
            record.set_master_enhancement_level(level)?;
        }

        record.recalculate_all()?;
        session.save_record(&self.record, &record)?;

        println!("{}", style("✓ Configuration updated").green().bold());
        print_summary(&record);
        Ok(())
    }
}
