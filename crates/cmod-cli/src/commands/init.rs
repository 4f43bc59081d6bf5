//! Init command
//!
//! Create the data directory with a default configuration and an empty board.

use anyhow::{Context, Result};
use clap::Args;
use cmod_core::account::Role;
use cmod_core::board::BoardStorage;
use cmod_core::config::Config;
use cmod_storage::FileSystemStorage;
use std::path::Path;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Register a first moderator account with this username
    #[arg(long)]
    pub moderator: Option<String>,

    /// Rewrite config.toml with defaults even if it exists
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let storage = FileSystemStorage::new(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    if storage.exists() && !args.force {
        eprintln!(
            "{} cmod already initialized in {}. Use --force to reset the configuration.",
            "⚠".yellow(),
            data_dir.display()
        );
        return Ok(());
    }

    let config_path = storage.config_path();
    if args.force || !config_path.exists() {
        Config::default()
            .save(&config_path)
            .context("Failed to write config.toml")?;
        println!("{} Wrote {}", "✓".green(), config_path.display());
    }

    let mut board = storage.load_or_default().context("Failed to load board")?;
    if let Some(name) = args.moderator.as_deref() {
        let id = board.accounts.register(name, Role::Moderator)?;
        println!("{} Registered moderator {} (#{})", "✓".green(), name.cyan(), id);
    }

    if !storage.exists() || args.moderator.is_some() {
        board.touch();
        storage.save(&board).context("Failed to write board")?;
        println!("{} Created {}", "✓".green(), storage.board_path().display());
    }

    println!("\n{}", "Next steps:".bold());
    println!("  {}", "cmod user add <name>".cyan());
    println!("  {}", "cmod post --as <name> debate:1 \"Hello\"".cyan());

    Ok(())
}
