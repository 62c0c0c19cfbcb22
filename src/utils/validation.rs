//! Input validation helpers shared by services, handlers and the CLI.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,7}$")
        .expect("email regex is valid")
});

/// Check that an address looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Trim and validate an email address.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(AppError::validation(format!("Invalid email address: {}", email)));
    }
    Ok(email.to_string())
}

/// Reduce an uploaded file name to a safe final path component.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Directory parts and leading dots are dropped.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}
