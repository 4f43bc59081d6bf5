//! File system storage for the board

use cmod_core::board::{Board, BoardFile, BoardMigrator, BoardStorage};
use cmod_core::config::CONFIG_FILE_NAME;
use cmod_core::error::{ModerationError, Result};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the board file inside the data directory
pub const BOARD_FILE_NAME: &str = "board.json";

/// Board stored as a single JSON file in a data directory
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    data_dir: PathBuf,
}

impl FileSystemStorage {
    /// Open a data directory, creating it if needed
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self {
            data_dir: data_dir.into(),
        };
        storage.ensure_dir()?;
        Ok(storage)
    }

    /// Per-user data directory, falling back to `~/.cmod`
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// Directory [`default_location`](Self::default_location) would use
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("org", "cmod", "cmod")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".cmod")
            })
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(|e| {
                ModerationError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
            debug!("Created data directory: {:?}", self.data_dir);
        }
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the board file
    pub fn board_path(&self) -> PathBuf {
        self.data_dir.join(BOARD_FILE_NAME)
    }

    /// Path of the config file kept next to the board
    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    fn temp_path(&self) -> PathBuf {
        self.data_dir.join(format!(".{}.tmp", BOARD_FILE_NAME))
    }

    /// Write to a temp file, then rename over the board file
    fn atomic_write(&self, board: &Board) -> Result<()> {
        let temp_path = self.temp_path();
        let final_path = self.board_path();

        let file = BoardFile::new(board.clone());

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            ModerationError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ModerationError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!(
            "Saved board ({} comments, {} users) to {:?}",
            board.comments.count(),
            board.accounts.count(),
            final_path
        );
        Ok(())
    }

    fn read_board(&self, path: &Path) -> Result<Board> {
        let file = fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ModerationError::FileNotFound(path.to_path_buf())
            } else {
                ModerationError::Io(e)
            }
        })?;

        let board_file: BoardFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ModerationError::from(e).with_context(format!("reading {:?}", path)))?;

        let board_file = if BoardMigrator::needs_migration(&board_file) {
            info!(
                "Migrating board file {:?} from schema {}",
                path, board_file.schema_version
            );
            BoardMigrator::migrate(board_file)?
        } else {
            board_file
        };

        Ok(board_file.into_board())
    }
}

impl BoardStorage for FileSystemStorage {
    fn save(&self, board: &Board) -> Result<()> {
        self.ensure_dir()?;
        self.atomic_write(board)
    }

    fn load(&self) -> Result<Board> {
        self.read_board(&self.board_path())
    }

    fn exists(&self) -> bool {
        self.board_path().exists()
    }
}
