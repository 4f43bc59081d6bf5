//! cmod-core - Core library for cmod
//!
//! This crate provides the comment moderation logic: the comment store,
//! visibility policy, moderation queue, moderation actions with their audit
//! log, and thread rendering.

pub mod error;
pub mod types;
pub mod config;
pub mod account;
pub mod comment;
pub mod policy;
pub mod queue;
pub mod activity;
pub mod board;
pub mod moderation;
pub mod thread;

pub use error::{ModerationError, Result};
pub use types::*;
