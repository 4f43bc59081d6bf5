//! cmod - comment moderation desk
//!
//! Flag, review and hide comments on debates, proposals and polls.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create the data directory with a first moderator
//! cmod init --moderator carol
//!
//! # Register a user and post
//! cmod user add alice
//! cmod post --as alice debate:1 "First!"
//!
//! # Work the queue
//! cmod queue --as carol
//! cmod review --as carol 1
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
