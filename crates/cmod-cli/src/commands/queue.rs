//! Queue command
//!
//! List flagged comments for moderators.

use super::{resolve_viewer, Workspace};
use anyhow::Result;
use clap::Args;
use cmod_core::comment::ModerationStatus;
use cmod_core::queue::{QueueView, QueueViewState};
use std::path::Path;

/// Arguments for the queue command
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Moderator (username or id)
    #[arg(long = "as", value_name = "USER")]
    pub user: String,

    /// all, pending_review or reviewed
    #[arg(long, short)]
    pub filter: Option<String>,

    /// Page number, starting at 1
    #[arg(long, short)]
    pub page: Option<String>,

    /// created or flags
    #[arg(long, short)]
    pub order: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the queue command
pub fn execute(args: QueueArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let board = workspace.load_board()?;
    let viewer = resolve_viewer(&board, Some(&args.user))?;

    let state = QueueViewState::from_params(
        args.filter.as_deref(),
        args.page.as_deref(),
        args.order.as_deref(),
    );
    let view = QueueView::build(
        &board,
        state,
        &viewer,
        &workspace.policy(),
        workspace.config.moderation.per_page,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{} {}",
        view.title.bold().underline(),
        format!(
            "page {} of {}, {} comments",
            view.rows.page,
            view.rows.total_pages(),
            view.rows.total_items
        )
        .dimmed()
    );
    let nav: Vec<String> = view
        .nav
        .iter()
        .map(|link| format!("{} ({})", link.label, link.count))
        .collect();
    println!("{}", format!("Also: {}", nav.join(" | ")).dimmed());
    println!();

    if view.is_empty() {
        println!("  Nothing to review.");
        return Ok(());
    }

    for row in &view.rows.items {
        let status = match row.status {
            ModerationStatus::PendingReview => row.status.label().yellow(),
            ModerationStatus::Reviewed => row.status.label().green(),
            _ => row.status.label().normal(),
        };
        println!(
            "  {:>5} {} {} on {} {}",
            format!("#{}", row.id).cyan(),
            status,
            row.author,
            row.commentable,
            format!("[{} flags]", row.flags_count).red()
        );
        println!("        {}", row.body.text);
    }

    if view.next_href.is_some() {
        println!(
            "\n  More: {}",
            format!("cmod queue --as {} --page {}", args.user, view.rows.page + 1).cyan()
        );
    }

    Ok(())
}
