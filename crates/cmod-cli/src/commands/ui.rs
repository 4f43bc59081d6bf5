//! UI command
//!
//! Open the interactive queue browser.

use super::{resolve_viewer, Workspace};
use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;

/// Arguments for the ui command
#[derive(Debug, Args)]
pub struct UiArgs {
    /// Moderator (username or id)
    #[arg(long = "as", value_name = "USER")]
    pub user: String,
}

/// Execute the ui command
pub fn execute(args: UiArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let board = workspace.load_board()?;
    let viewer = resolve_viewer(&board, Some(&args.user))?;
    if !viewer.is_moderator() {
        bail!("'{}' is not a moderator", args.user);
    }

    let config = workspace.config.clone();
    let mut app = cmod_ui::App::new(board, Box::new(workspace.storage), viewer, &config)?;
    app.run()?;
    let remaining = app.board().comments.count();
    drop(app);

    println!("{} Queue browser closed ({} comments on the board)", "✓".green(), remaining);
    Ok(())
}
