//! Config command
//!
//! Manage cmod configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use cmod_core::config::{Config, CONFIG_FILE_NAME};
use std::fs;
use std::path::{Path, PathBuf};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Validate configuration
    Validate,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, data_dir: &Path) -> Result<()> {
    let config_path = config_path(data_dir);
    match cmd {
        ConfigCommand::Show { json } => show_config(&config_path, json),
        ConfigCommand::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommand::Validate => validate_config(&config_path),
        ConfigCommand::Reset { force } => reset_config(&config_path, force),
    }
}

fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Configuration:".bold().underline());
        if config_path.exists() {
            println!("{}", config_path.display().to_string().dimmed());
        } else {
            println!("{}", "(defaults, no config file)".dimmed());
        }
        println!();
        println!("{}", config.to_toml()?);
    }

    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    use colored::Colorize;

    if !config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            config_path.display()
        );
        return Ok(());
    }

    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content).context("Invalid TOML")?;
    println!("{} Configuration is valid TOML", "✓".green());

    let missing: Vec<_> = ["moderation", "storage", "web", "ui"]
        .into_iter()
        .filter(|section| value.get(section).is_none())
        .collect();
    for section in &missing {
        println!(
            "{} [{}] section not found, using defaults",
            "⚠".yellow(),
            section
        );
    }

    Config::load(config_path)?;
    println!("{} All values are in range", "✓".green());

    Ok(())
}

fn reset_config(config_path: &Path, force: bool) -> Result<()> {
    use colored::Colorize;

    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default().save(config_path)?;
    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}
