//! Hide, review and ban commands

use super::{resolve_viewer, Workspace};
use anyhow::Result;
use clap::Args;
use cmod_core::moderation::{ActionOutcome, ModerationAction, ModerationService};
use cmod_core::types::CommentId;
use std::path::Path;

/// Arguments shared by the moderation commands
#[derive(Debug, Args)]
pub struct ModerateArgs {
    /// Moderator (username or id)
    #[arg(long = "as", value_name = "USER")]
    pub user: String,

    /// Comment ids; several ids are applied all or nothing
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<CommentId>,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

pub fn hide(args: ModerateArgs, data_dir: &Path) -> Result<()> {
    run(ModerationAction::Hide, args, data_dir)
}

pub fn review(args: ModerateArgs, data_dir: &Path) -> Result<()> {
    run(ModerationAction::MarkReviewed, args, data_dir)
}

pub fn ban(args: ModerateArgs, data_dir: &Path) -> Result<()> {
    run(ModerationAction::BanAuthor, args, data_dir)
}

fn run(action: ModerationAction, args: ModerateArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let mut board = workspace.load_board()?;
    let actor = resolve_viewer(&board, Some(&args.user))?;

    if !args.yes && !confirm(action, &args.ids)? {
        println!("Cancelled.");
        return Ok(());
    }

    let outcomes = ModerationService::new(&mut board).bulk(action, &args.ids, &actor)?;
    workspace.save_board(&board)?;

    for (id, outcome) in args.ids.iter().zip(outcomes) {
        match outcome {
            ActionOutcome::Applied => {
                println!("{} {}: comment {}", "✓".green(), action.label(), id)
            }
            ActionOutcome::Unchanged => println!(
                "{} {}: comment {} {}",
                "·".dimmed(),
                action.label(),
                id,
                "(no change)".dimmed()
            ),
        }
    }
    Ok(())
}

fn confirm(action: ModerationAction, ids: &[CommentId]) -> Result<bool> {
    use dialoguer::Confirm;

    let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let confirmed = Confirm::new()
        .with_prompt(format!("{} comment(s) {}?", action.label(), ids.join(", ")))
        .default(false)
        .interact()?;
    Ok(confirmed)
}
