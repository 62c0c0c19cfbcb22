//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `jobs` - Email worker and queue inspection
//! - `seed` - Demo data
//! - `admin`, `alumnus`, `company`, `listing`, `user` - Entity commands

pub mod args;

pub use args::{Cli, Commands};
