//! `new`: create an empty record file.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use enchant_content::{ConfigLoader, ContentFactory};
use enchant_core::{EnchantmentRecord, RecordConfig};

use super::Session;
use super::show::print_summary;

/// Create an empty record
#[derive(Parser, Debug)]
pub struct New {
    /// Record configuration TOML (defaults to `record.toml` in the data
    /// directory, then to built-in defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record JSON file to create
    #[arg(long)]
    pub out: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl New {
    pub fn execute(self, session: &Session) -> Result<()> {
        if self.out.exists() && !self.force {
            bail!(
                "{} already exists (use --force to overwrite)",
                self.out.display()
            );
        }

        let config = self.resolve_config(session)?;
        let record = EnchantmentRecord::new(session.oracle(), config)?;
        session.save_record(&self.out, &record)?;

        tracing::info!(path = %self.out.display(), "created record");
        println!(
            "{} {}",
            style("✓ Created").green().bold(),
            style(self.out.display()).dim()
        );
        print_summary(&record);
        Ok(())
    }

    fn resolve_config(&self, session: &Session) -> Result<RecordConfig> {
        if let Some(path) = &self.config {
            return ConfigLoader::load(path);
        }
        if let Some(dir) = &session.data_dir {
            let factory = ContentFactory::new(dir);
            if factory.config_path().exists() {
                return factory.load_config();
            }
        }
        Ok(RecordConfig::default())
    }
}
