//! Board storage trait and abstractions

use super::model::Board;
use crate::error::Result;

/// Trait for board storage implementations
pub trait BoardStorage: Send + Sync {
    /// Save the board
    fn save(&self, board: &Board) -> Result<()>;

    /// Load the board
    fn load(&self) -> Result<Board>;

    /// Check if a board has been saved
    fn exists(&self) -> bool;

    /// Load the board, or start an empty one if nothing is saved yet
    fn load_or_default(&self) -> Result<Board> {
        if self.exists() {
            self.load()
        } else {
            Ok(Board::new())
        }
    }
}

/// In-memory storage
pub mod memory {
    use super::*;
    use crate::error::ModerationError;
    use std::sync::RwLock;

    /// In-memory board storage for tests and ephemeral servers
    pub struct MemoryStorage {
        board: RwLock<Option<Board>>,
    }

    impl MemoryStorage {
        /// Create an empty in-memory storage
        pub fn new() -> Self {
            Self {
                board: RwLock::new(None),
            }
        }

        /// Create a storage pre-populated with a board
        pub fn with_board(board: Board) -> Self {
            Self {
                board: RwLock::new(Some(board)),
            }
        }
    }

    impl Default for MemoryStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    fn poisoned() -> ModerationError {
        ModerationError::Io(std::io::Error::other("board storage lock poisoned"))
    }

    impl BoardStorage for MemoryStorage {
        fn save(&self, board: &Board) -> Result<()> {
            let mut slot = self.board.write().map_err(|_| poisoned())?;
            *slot = Some(board.clone());
            Ok(())
        }

        fn load(&self) -> Result<Board> {
            let slot = self.board.read().map_err(|_| poisoned())?;
            slot.clone().ok_or_else(|| {
                ModerationError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no board saved",
                ))
            })
        }

        fn exists(&self) -> bool {
            self.board.read().map(|slot| slot.is_some()).unwrap_or(false)
        }
    }

}
