//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module. Entity commands share the
//! connection setup in `context`.

mod context;

pub mod admin;
pub mod alumnus;
pub mod company;
pub mod jobs;
pub mod listing;
pub mod migrate;
pub mod seed;
pub mod serve;
pub mod user;
