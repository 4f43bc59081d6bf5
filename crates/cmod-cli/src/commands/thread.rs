//! Thread command
//!
//! Print a comment thread as a given viewer sees it.

use super::{resolve_viewer, Workspace};
use anyhow::Result;
use clap::Args;
use cmod_core::policy::RenderedBody;
use cmod_core::thread::ThreadView;
use cmod_core::types::CommentableRef;
use std::path::Path;

/// Arguments for the thread command
#[derive(Debug, Args)]
pub struct ThreadArgs {
    /// Thread to show, e.g. debate:1
    pub commentable: CommentableRef,

    /// View as this user (default: anonymous visitor)
    #[arg(long = "as", value_name = "USER")]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the thread command
pub fn execute(args: ThreadArgs, data_dir: &Path) -> Result<()> {
    use colored::Colorize;

    let workspace = Workspace::open(data_dir)?;
    let board = workspace.load_board()?;
    let viewer = resolve_viewer(&board, args.user.as_deref())?;

    let view = ThreadView::build(&board, args.commentable, &viewer, &workspace.policy());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "{} {}",
        args.commentable.to_string().bold(),
        format!("({} comments)", view.count()).dimmed()
    );
    if view.is_empty() {
        println!("  No comments yet.");
        return Ok(());
    }

    for (depth, node) in view.flatten() {
        let indent = "  ".repeat(depth + 1);
        let mut header = format!("#{} {}", node.id, node.author);
        if let Some(flags) = node.flags_count.filter(|n| *n > 0) {
            header.push_str(&format!(" [{} flags]", flags));
        }
        let mut links = Vec::new();
        if node.actions.hide {
            links.push("hide");
        }
        if node.actions.ban_author {
            links.push("ban");
        }
        if node.actions.flag {
            links.push("flag");
        }
        if node.actions.unflag {
            links.push("unflag");
        }

        println!(
            "{}{} {} {}",
            indent,
            header.cyan(),
            node.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            links.join(" ").yellow()
        );
        println!("{}  {}", indent, styled_body(&node.body));
    }

    Ok(())
}

fn styled_body(body: &RenderedBody) -> String {
    use colored::Colorize;

    if body.redacted {
        body.text.italic().dimmed().to_string()
    } else if body.faded {
        format!("{} {}", body.text.dimmed(), "(hidden)".red())
    } else {
        body.text.clone()
    }
}
