//! cmod-ui - TUI library for cmod
//!
//! This crate provides a terminal queue browser for moderators.
//!
//! # Overview
//!
//! The TUI provides:
//! - The moderation queue with filter tabs and paging
//! - Hide, review and ban actions with confirmation
//! - Status bar with the current filter, page and order
//!
//! # Example
//!
//! ```ignore
//! use cmod_ui::App;
//!
//! let mut app = App::new(board, Box::new(storage), viewer, &config)?;
//! app.run()?;
//! ```

pub mod app;
pub mod theme;

pub use app::{App, AppMode, AppState, Browser};
pub use theme::Theme;
