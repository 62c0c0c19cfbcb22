//! Password value object.
//!
//! Every account kind hashes with the same Argon2id defaults. Only the PHC
//! string ever leaves this module.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// Hash checked when the login email matches no account.
static DECOY_HASH: Lazy<String> =
    Lazy::new(|| hash_plain("no-such-account").unwrap_or_default());

/// A stored Argon2 hash.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl Password {
    /// Validate the length of `plain_text` and hash it.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let len = plain_text.chars().count() as u64;
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
            return Err(AppError::validation(format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        Ok(Self {
            hash: hash_plain(plain_text)?,
        })
    }

    /// Wrap a hash loaded from the accounts table.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    pub fn verify(&self, plain_text: &str) -> bool {
        matches_hash(plain_text, &self.hash)
    }

    /// Check a login attempt. Without a stored hash a decoy hash is verified
    /// so unknown emails take as long as wrong passwords.
    pub fn verify_stored(stored_hash: Option<&str>, plain_text: &str) -> bool {
        match stored_hash {
            Some(hash) => matches_hash(plain_text, hash),
            None => {
                matches_hash(plain_text, &DECOY_HASH);
                false
            }
        }
    }
}

fn hash_plain(plain_text: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain_text.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))
}

/// False for a mismatch and for a malformed stored hash.
fn matches_hash(plain_text: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_original() {
        let password = Password::new("robpass123").unwrap();
        assert!(password.verify("robpass123"));
        assert!(!password.verify("robpass124"));

        let restored = Password::from_hash(password.as_str().to_string());
        assert!(restored.verify("robpass123"));
    }

    #[test]
    fn test_salts_differ_per_hash() {
        let first = Password::new("compass123").unwrap();
        let second = Password::new("compass123").unwrap();
        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_length_limits() {
        assert!(Password::new("1234567").is_err());
        assert!(Password::new("12345678").is_ok());
        assert!(Password::new(&"x".repeat(MAX_PASSWORD_LENGTH as usize + 1)).is_err());
    }

    #[test]
    fn test_verify_stored_without_account() {
        let password = Password::new("alumnus-pass").unwrap();
        assert!(Password::verify_stored(Some(password.as_str()), "alumnus-pass"));
        assert!(!Password::verify_stored(Some(password.as_str()), "other-pass"));
        assert!(!Password::verify_stored(None, "alumnus-pass"));
        assert!(!Password::verify_stored(Some("not-a-phc-string"), "alumnus-pass"));
    }

    #[test]
    fn test_debug_hides_hash() {
        let password = Password::new("bobpass123").unwrap();
        assert_eq!(format!("{:?}", password), "Password([REDACTED])");
    }
}
