//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod init;
pub mod log;
pub mod moderate;
pub mod post;
pub mod queue;
pub mod report;
pub mod thread;
pub mod ui;
pub mod user;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cmod_core::account::Viewer;
use cmod_core::board::{Board, BoardStorage};
use cmod_core::config::Config;
use cmod_core::policy::VisibilityPolicy;
use cmod_storage::FileSystemStorage;
use std::path::{Path, PathBuf};

/// cmod - comment moderation desk
#[derive(Debug, Parser)]
#[command(name = "cmod")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Data directory holding board.json and config.toml
    #[arg(long, global = true, env = "CMOD_DATA_DIR", default_value = ".cmod")]
    pub data_dir: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the data directory
    Init(init::InitArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),

    /// Manage user accounts
    #[command(subcommand)]
    User(user::UserCommand),

    /// Post a comment or a reply
    Post(post::PostArgs),

    /// Show the comment thread of a debate, proposal or poll
    Thread(thread::ThreadArgs),

    /// Flag a comment as inappropriate
    Flag(report::ReportArgs),

    /// Withdraw your flag from a comment
    Unflag(report::ReportArgs),

    /// Show the moderation queue
    Queue(queue::QueueArgs),

    /// Hide comments
    Hide(moderate::ModerateArgs),

    /// Mark flagged comments as reviewed
    Review(moderate::ModerateArgs),

    /// Ban the authors of comments
    Ban(moderate::ModerateArgs),

    /// Show the moderation log
    Log(log::LogArgs),

    /// Browse the moderation queue in a terminal UI
    Ui(ui::UiArgs),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let data_dir = cli.data_dir.as_path();
    match cli.command {
        Commands::Init(args) => init::execute(args, data_dir),
        Commands::Config(cmd) => config::execute(cmd, data_dir),
        Commands::User(cmd) => user::execute(cmd, data_dir),
        Commands::Post(args) => post::execute(args, data_dir),
        Commands::Thread(args) => thread::execute(args, data_dir),
        Commands::Flag(args) => report::flag(args, data_dir),
        Commands::Unflag(args) => report::unflag(args, data_dir),
        Commands::Queue(args) => queue::execute(args, data_dir),
        Commands::Hide(args) => moderate::hide(args, data_dir),
        Commands::Review(args) => moderate::review(args, data_dir),
        Commands::Ban(args) => moderate::ban(args, data_dir),
        Commands::Log(args) => log::execute(args, data_dir),
        Commands::Ui(args) => ui::execute(args, data_dir),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// An initialized data directory with its configuration
pub struct Workspace {
    pub storage: FileSystemStorage,
    pub config: Config,
}

impl Workspace {
    /// Open a data directory created by `cmod init`
    pub fn open(data_dir: &Path) -> Result<Self> {
        if !data_dir.join(cmod_storage::BOARD_FILE_NAME).exists() {
            bail!(
                "No board found in {}. Run 'cmod init' first.",
                data_dir.display()
            );
        }

        let storage = FileSystemStorage::new(data_dir)?;
        let config = Config::load_or_default(&storage.config_path())
            .with_context(|| format!("Invalid configuration in {}", data_dir.display()))?;

        Ok(Self { storage, config })
    }

    pub fn load_board(&self) -> Result<Board> {
        self.storage.load().context("Failed to load board")
    }

    pub fn save_board(&self, board: &Board) -> Result<()> {
        self.storage.save(board).context("Failed to save board")
    }

    pub fn policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::new(self.config.moderation.placeholder.clone())
    }
}

/// Viewer for an `--as` value: anonymous when absent, and for banned users
pub fn resolve_viewer(board: &Board, user: Option<&str>) -> Result<Viewer> {
    match user {
        None => Ok(Viewer::anonymous()),
        Some(name) => {
            let account = board
                .accounts
                .resolve(name)
                .with_context(|| format!("Unknown user '{}'", name))?;
            if account.is_banned() {
                tracing::warn!("User {} is banned and acts anonymously", account.username);
            }
            Ok(account.viewer())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use cmod_core::account::Role;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "cmod", "-vv", "--data-dir", "/tmp/x", "queue", "--as", "carol",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.command, Commands::Queue(_)));
    }

    #[test]
    fn test_resolve_viewer() {
        let mut board = Board::new();
        let carol = board.accounts.register("carol", Role::Moderator).unwrap();

        assert_eq!(resolve_viewer(&board, None).unwrap(), Viewer::anonymous());
        assert_eq!(
            resolve_viewer(&board, Some("carol")).unwrap(),
            Viewer::moderator(carol)
        );
        assert_eq!(
            resolve_viewer(&board, Some("1")).unwrap(),
            Viewer::moderator(carol)
        );
        assert!(resolve_viewer(&board, Some("nobody")).is_err());
    }
}
