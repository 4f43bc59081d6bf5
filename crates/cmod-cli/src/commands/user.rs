//! User command
//!
//! Register and inspect accounts.

use super::Workspace;
use anyhow::Result;
use clap::Subcommand;
use cmod_core::account::{Role, UserAccount};
use cmod_core::activity::ActivityTarget;
use std::path::Path;

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a new account
    Add {
        /// Username (no spaces)
        username: String,

        /// Give the account the moderator role
        #[arg(long)]
        moderator: bool,
    },

    /// List accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an account
    Show {
        /// Username or id
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the user command
pub fn execute(cmd: UserCommand, data_dir: &Path) -> Result<()> {
    let workspace = Workspace::open(data_dir)?;
    match cmd {
        UserCommand::Add {
            username,
            moderator,
        } => add_user(&workspace, &username, moderator),
        UserCommand::List { json } => list_users(&workspace, json),
        UserCommand::Show { user, json } => show_user(&workspace, &user, json),
    }
}

fn add_user(workspace: &Workspace, username: &str, moderator: bool) -> Result<()> {
    use colored::Colorize;

    let role = if moderator { Role::Moderator } else { Role::Citizen };
    let mut board = workspace.load_board()?;
    let id = board.accounts.register(username, role)?;
    board.touch();
    workspace.save_board(&board)?;

    println!(
        "{} Registered {} {} (#{})",
        "✓".green(),
        role,
        username.cyan(),
        id
    );
    Ok(())
}

fn list_users(workspace: &Workspace, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let board = workspace.load_board()?;
    let accounts = board.accounts.all();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    println!("{}", "Users:".bold().underline());
    println!();
    for account in accounts {
        println!(
            "  {:>4}  {} {}{}",
            format!("#{}", account.id).dimmed(),
            account.username.cyan(),
            role_badge(account),
            if account.is_banned() {
                " banned".red().to_string()
            } else {
                String::new()
            }
        );
    }
    Ok(())
}

fn show_user(workspace: &Workspace, user: &str, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let board = workspace.load_board()?;
    let account = board.accounts.resolve(user)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(account)?);
        return Ok(());
    }

    let comments = board.comments.get_by_author(account.id);
    let hidden = comments.iter().filter(|c| c.is_hidden()).count();

    println!("{} {}", account.username.bold(), role_badge(account));
    println!("  Id:       {}", account.id);
    println!("  Joined:   {}", account.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Comments: {} ({} hidden)", comments.len(), hidden);
    if let Some(banned_at) = account.banned_at {
        let by = account
            .banned_by
            .map(|id| board.accounts.display_name(id))
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "  {} on {} by {}",
            "Banned".red(),
            banned_at.format("%Y-%m-%d %H:%M"),
            by
        );
    }

    let actions = board.activity.for_target(ActivityTarget::User(account.id));
    if !actions.is_empty() {
        println!("  Log entries: {}", actions.len());
    }
    Ok(())
}

fn role_badge(account: &UserAccount) -> String {
    use colored::Colorize;

    if account.is_moderator() {
        "[moderator]".magenta().to_string()
    } else {
        String::new()
    }
}
