//! Enchantment ledger command-line driver.
//!
//! A thin, file-based front end over `enchant-core`: every subcommand loads a
//! record snapshot, applies one ledger operation, and writes it back.
//!
//! # Examples
//!
//! ```bash
//! enchant new --out sword.json
//! enchant add sword.json str=8 dex=4
//! enchant add sword.json atk=-5 --at 0
//! enchant configure sword.json --smithing 250 --understanding beast=40
//! enchant show sword.json --format steps
//! ```

mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Add, CatalogCmd, Configure, Ignore, Move, New, Remove, Session, Show, Update};
use config::AppConfig;

/// Enchantment crafting ledger
#[derive(Parser)]
#[command(name = "enchant")]
#[command(about = "Plan enchantment steps and track potential, materials and success rates", long_about = None)]
#[command(version)]
struct Cli {
    /// Property catalog RON file (overrides ENCHANT_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory with properties.ron / record.toml (overrides ENCHANT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Create an empty record
    New(New),

    /// Print a record
    Show(Show),

    /// Append or insert a step
    Add(Add),

    /// Replace the entries of a step
    Update(Update),

    /// Delete a step
    Remove(Remove),

    /// Toggle whether a step counts
    Ignore(Ignore),

    /// Move a step to another position
    Move(Move),

    /// Change record configuration and replay
    Configure(Configure),

    /// List catalog properties
    Catalog(CatalogCmd),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for ENCHANT_* variables)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let _guard = logging::setup_logging(&config.log_dir, cli.verbose)?;
    tracing::debug!(?config, "starting");

    let session = Session::open(&config)?;

    let result = match cli.command {
        Command::New(cmd) => cmd.execute(&session),
        Command::Show(cmd) => cmd.execute(&session),
        Command::Add(cmd) => cmd.execute(&session),
        Command::Update(cmd) => cmd.execute(&session),
        Command::Remove(cmd) => cmd.execute(&session),
        Command::Ignore(cmd) => cmd.execute(&session),
        Command::Move(cmd) => cmd.execute(&session),
        Command::Configure(cmd) => cmd.execute(&session),
        Command::Catalog(cmd) => cmd.execute(&session),
    };

    if let Err(error) = &result {
        tracing::error!("{error:#}");
    }
    result
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_accepts_negative_deltas_and_position() {
        let cli = Cli::try_parse_from(["enchant", "add", "r.json", "str=5", "dex=-3", "--at", "1"])
            .expect("parse");
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.enchantments.len(), 2);
        assert_eq!(add.enchantments[1].value, -3);
        assert_eq!(add.at, Some(1));
    }

    #[test]
    fn configure_collects_understanding() {
        let cli = Cli::try_parse_from([
            "enchant",
            "configure",
            "r.json",
            "--equipment",
            "armor",
            "--understanding",
            "metal=40",
            "--understanding",
            "mana=5",
            "-v",
        ])
        .expect("parse");
        assert!(cli.verbose);
        let Command::Configure(configure) = cli.command else {
            panic!("expected configure");
        };
        assert_eq!(
            configure.equipment,
            Some(enchant_core::EquipmentType::Armor)
        );
        assert_eq!(configure.understanding.len(), 2);
    }
}
