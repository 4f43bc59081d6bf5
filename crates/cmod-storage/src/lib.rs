//! cmod-storage - Storage library for cmod
//!
//! This crate provides the file system backend for boards.

mod board_store;

pub use board_store::{FileSystemStorage, BOARD_FILE_NAME};
