//! Alumni Job Board - connects alumni with companies that are hiring.
//!
//! Companies post job listings, admins approve them, and alumni search,
//! save and apply to the approved ones. Alumni can subscribe to companies
//! and are notified (in-app and by email) when those companies publish.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Accounts, listings, applications and notifications
//! - **services**: Use cases behind both the HTTP API and the CLI
//! - **infra**: Database, cache, upload storage and repositories
//! - **jobs**: Background email delivery
//! - **api**: HTTP handlers, middleware and routes
//! - **types**: Shared types (pagination, responses)
//! - **utils**: Validation helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Load demo data, then search it
//! cargo run -- seed
//! cargo run -- listing search --q company
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, AccountKind, Password};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
