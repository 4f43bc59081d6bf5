//! Post command
//!
//! Add a comment or a reply to a thread.

use super::{resolve_viewer, Workspace};
use anyhow::Result;
use clap::Args;
use cmod_core::moderation::ModerationService;
use cmod_core::types::{CommentId, CommentableRef};
use std::path::Path;

/// Arguments for the post command
#[derive(Debug, Args)]
pub struct PostArgs {
    /// Author (username or id)
    #[arg(long = "as", value_name = "USER")]
    pub user: String,

    /// Thread to post on, e.g. debate:1 or proposals/4
    pub commentable: CommentableRef,

    /// Comment text
    pub body: String,

    /// Reply to this comment
    #[arg(long, value_name = "ID")]
    pub reply_to: Option<CommentId>,
}

/// Execute the post command
pub fn execute(args: PostArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let mut board = workspace.load_board()?;
    let author = resolve_viewer(&board, Some(&args.user))?;

    let id = ModerationService::with_config(&mut board, &workspace.config.moderation).post(
        &author,
        args.commentable,
        args.reply_to,
        &args.body,
    )?;
    workspace.save_board(&board)?;

    println!(
        "{} Posted comment {} on {}",
        "✓".green(),
        id.to_string().cyan(),
        args.commentable
    );
    Ok(())
}
