//! Board aggregate and persistence
//!
//! A board holds everything the moderation desk keeps between runs:
//! comments with their flags, user accounts and the moderation log.
//!
//! # Example
//!
//! ```ignore
//! use cmod_core::board::{Board, BoardStorage};
//! use cmod_storage::FileSystemStorage;
//!
//! let storage = FileSystemStorage::new(".cmod")?;
//! let mut board = storage.load_or_default()?;
//! board.accounts.register("alice", Role::Moderator)?;
//! storage.save(&board)?;
//! ```

pub mod migration;
mod model;
mod persistence;

pub use migration::{BoardFile, BoardMigrator, CURRENT_SCHEMA_VERSION};
pub use model::{Board, BoardInfo};
pub use persistence::memory::MemoryStorage;
pub use persistence::BoardStorage;
