//! Flag and unflag commands

use super::{resolve_viewer, Workspace};
use anyhow::Result;
use clap::Args;
use cmod_core::moderation::ModerationService;
use cmod_core::types::CommentId;
use std::path::Path;

/// Arguments for flag and unflag
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Reporting user (username or id)
    #[arg(long = "as", value_name = "USER")]
    pub user: String,

    /// Comment id
    pub id: CommentId,
}

/// Flag a comment as inappropriate
pub fn flag(args: ReportArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let mut board = workspace.load_board()?;
    let reporter = resolve_viewer(&board, Some(&args.user))?;

    ModerationService::new(&mut board).flag(&reporter, args.id)?;
    workspace.save_board(&board)?;

    println!("{} Flagged comment {}", "✓".green(), args.id);
    Ok(())
}

/// Withdraw a flag
pub fn unflag(args: ReportArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let mut board = workspace.load_board()?;
    let reporter = resolve_viewer(&board, Some(&args.user))?;

    ModerationService::new(&mut board).unflag(&reporter, args.id)?;
    workspace.save_board(&board)?;

    println!("{} Removed your flag from comment {}", "✓".green(), args.id);
    Ok(())
}
