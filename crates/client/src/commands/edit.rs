//! Step editing commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use console::style;
use enchant_core::{Enchantment, EnchantmentRecord, StepDraft, StepId};

use super::show::format_step_line;
use super::{Session, parse_enchantment, require_file};

/// Append or insert a step
#[derive(Parser, Debug)]
pub struct Add {
    /// Record JSON file
    pub record: PathBuf,

    /// Entries as PROP=DELTA (e.g. `str=5 dex=-3`)
    #[arg(required = true, value_parser = parse_enchantment)]
    pub enchantments: Vec<Enchantment>,

    /// Insert at this position (0-based) instead of appending
    #[arg(long)]
    pub at: Option<usize>,

    /// Record the step without letting it count
    #[arg(long)]
    pub ignored: bool,
}

impl Add {
    pub fn execute(self, session: &Session) -> Result<()> {
        edit_record(session, &self.record, |record| {
            let mut draft = StepDraft::new(self.enchantments);
            draft.is_ignored = self.ignored;
            let id = match self.at {
                Some(index) => record.insert_step(index, draft)?,
                None => record.add_step(draft)?,
            };
            Ok(Some(id))
        })
    }
}

/// Replace the entries of a step
#[derive(Parser, Debug)]
pub struct Update {
    /// Record JSON file
    pub record: PathBuf,

    /// Step to edit
    pub step: String,

    /// New entries as PROP=DELTA
    #[arg(value_parser = parse_enchantment)]
    pub enchantments: Vec<Enchantment>,
}

impl Update {
    pub fn execute(self, session: &Session) -> Result<()> {
        let id = StepId::new(self.step);
        edit_record(session, &self.record, |record| {
            record.update_step(&id, self.enchantments)?;
            Ok(Some(id))
        })
    }
}

/// Delete a step
#[derive(Parser, Debug)]
pub struct Remove {
    /// Record JSON file
    pub record: PathBuf,

    /// Step to delete
    pub step: String,
}

impl Remove {
    pub fn execute(self, session: &Session) -> Result<()> {
        let id = StepId::new(self.step);
        edit_record(session, &self.record, |record| {
            let removed = record.remove_step(&id)?;
            println!("{} {} ({})", style("✓ Removed").green().bold(), id, removed);
            Ok(None)
        })
    }
}

/// Mark a step as ignored (or counted again with --off)
#[derive(Parser, Debug)]
pub struct Ignore {
    /// Record JSON file
    pub record: PathBuf,

    /// Step to toggle
    pub step: String,

    /// Count the step again
    #[arg(long)]
    pub off: bool,
}

impl Ignore {
    pub fn execute(self, session: &Session) -> Result<()> {
        let id = StepId::new(self.step);
        edit_record(session, &self.record, |record| {
            record.set_step_ignored(&id, !self.off)?;
            Ok(Some(id))
        })
    }
}

/// Move a step to another position
#[derive(Parser, Debug)]
pub struct Move {
    /// Record JSON file
    pub record: PathBuf,

    /// Step to move
    pub step: String,

    /// Target position (0-based)
    pub index: usize,
}

impl Move {
    pub fn execute(self, session: &Session) -> Result<()> {
        let id = StepId::new(self.step);
        edit_record(session, &self.record, |record| {
            record.move_step(&id, self.index)?;
            Ok(Some(id))
        })
    }
}

/// Loads the record, applies `edit`, saves it, and echoes the touched step.
fn edit_record<F>(session: &Session, path: &Path, edit: F) -> Result<()>
where
    F: FnOnce(&mut EnchantmentRecord) -> Result<Option<StepId>>,
{
    require_file(path)?;
    let mut record = session.load_record(path)?;
    let touched = edit(&mut record)?;
    session.save_record(path, &record)?;

    if let Some(index) = touched.and_then(|id| record.position(&id)) {
        println!("{}", style("✓ Saved").green().bold());
        println!("{}", format_step_line(index, &record.steps()[index]));
    }
    println!(
        "  Final potential {}, {} step(s)",
        style(record.final_potential()).bold(),
        record.len()
    );
    Ok(())
}
