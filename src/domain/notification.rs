//! In-app notification addressed to a single account.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Account;
use crate::config::MAX_NOTIFICATION_LENGTH;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    #[schema(example = "Sample Company posted a new listing, Junior Developer!")]
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub reviewed_by_user: bool,
}

/// A notification about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub message: String,
}

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// A single account of any kind
    Account(Uuid),
    /// A company account; other kinds resolve to `NotFound`
    Company(Uuid),
    Admins,
    /// Every alumnus subscribed to the company
    Subscribers(Uuid),
}

/// A message resolved to its recipients, ready to be stored and emailed.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub recipients: Vec<Account>,
    pub message: String,
}

impl Dispatch {
    pub fn new(recipients: Vec<Account>, message: impl Into<String>) -> Self {
        Self {
            recipients,
            message: message.into(),
        }
    }

    /// One row per recipient
    pub fn rows(&self) -> Vec<NewNotification> {
        self.recipients
            .iter()
            .map(|account| NewNotification {
                recipient_id: account.id,
                message: self.message.clone(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

/// Rows for several dispatches written together.
pub fn rows_of(dispatches: &[Dispatch]) -> Vec<NewNotification> {
    dispatches.iter().flat_map(Dispatch::rows).collect()
}

/// Check a message before fanning it out.
pub fn validate_message(message: &str) -> AppResult<()> {
    if message.trim().is_empty() || message.chars().count() > MAX_NOTIFICATION_LENGTH {
        return Err(AppError::validation(format!(
            "Notification message must be between 1 and {} characters",
            MAX_NOTIFICATION_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_bounds() {
        assert!(validate_message("Hello").is_ok());
        assert!(validate_message(" ").is_err());
        assert!(validate_message(&"a".repeat(MAX_NOTIFICATION_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_dispatch_rows_address_each_recipient() {
        use crate::domain::AccountProfile;
        use chrono::Utc;

        let admin = |email: &str| Account {
            id: Uuid::new_v4(),
            login_email: email.to_string(),
            password_hash: "hash".to_string(),
            profile_photo_file_path: None,
            profile: AccountProfile::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let first = Dispatch::new(vec![admin("a@mail.com"), admin("b@mail.com")], "Hi");
        let second = Dispatch::new(vec![], "Nobody");

        let rows = rows_of(&[first.clone(), second]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].recipient_id, first.recipients[1].id);
        assert!(rows.iter().all(|r| r.message == "Hi"));
    }
}
