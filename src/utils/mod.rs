//! Utility functions and helpers.

pub mod validation;

pub use validation::{is_valid_email, normalize_email, sanitize_file_name};
