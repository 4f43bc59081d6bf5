//! Log command
//!
//! Show recent moderator actions.

use super::Workspace;
use anyhow::Result;
use clap::Args;
use std::path::Path;

/// Arguments for the log command
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Number of entries to show
    #[arg(long, short, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the log command
pub fn execute(args: LogArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let board = workspace.load_board()?;
    let entries = board.activity.recent(args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No moderation activity yet.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "  {} {} {} {}",
            entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            board.accounts.display_name(entry.actor_id).cyan(),
            entry.action,
            entry.target
        );
    }

    if board.activity.len() > args.limit {
        println!(
            "\n  {} Showing {} of {} entries. Use --limit to show more.",
            "ℹ".blue(),
            args.limit,
            board.activity.len()
        );
    }
    Ok(())
}
