//! Account domain entity and related types.
//!
//! Every user of the board is an `Account`; what kind of account it is lives
//! in the `AccountProfile` tagged union. Login emails are unique across all
//! kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{KIND_ADMIN, KIND_ALUMNUS, KIND_COMPANY, MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::errors::{AppError, AppResult};

/// Account kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Admin,
    Alumnus,
    Company,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Admin => KIND_ADMIN,
            AccountKind::Alumnus => KIND_ALUMNUS,
            AccountKind::Company => KIND_COMPANY,
        }
    }
}

impl std::str::FromStr for AccountKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            KIND_ADMIN => Ok(AccountKind::Admin),
            KIND_ALUMNUS => Ok(AccountKind::Alumnus),
            KIND_COMPANY => Ok(AccountKind::Company),
            other => Err(AppError::validation(format!(
                "Unknown account kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alumnus-specific profile data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AlumnusProfile {
    #[schema(example = "Rob")]
    pub first_name: String,
    #[schema(example = "Singh")]
    pub last_name: String,
    #[schema(example = "868-555-0100")]
    pub phone_number: Option<String>,
}

/// Company-specific profile data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyProfile {
    #[schema(example = "Sample Company")]
    pub company_name: String,
    #[schema(example = "1 Frederick Street, Port of Spain")]
    pub mailing_address: String,
    #[schema(example = "https://sample.example.com")]
    pub website_url: Option<String>,
    pub phone_number: Option<String>,
    #[schema(example = "careers@sample.example.com")]
    pub public_email: Option<String>,
}

impl AlumnusProfile {
    /// Trim fields and enforce name lengths.
    pub fn normalized(self) -> AppResult<Self> {
        Ok(Self {
            first_name: checked_name("First name", &self.first_name)?,
            last_name: checked_name("Last name", &self.last_name)?,
            phone_number: blank_to_none(self.phone_number),
        })
    }
}

impl CompanyProfile {
    /// Trim fields; company name and mailing address are required.
    pub fn normalized(self) -> AppResult<Self> {
        let company_name = self.company_name.trim().to_string();
        if company_name.is_empty() {
            return Err(AppError::validation("Company name is required"));
        }
        let mailing_address = self.mailing_address.trim().to_string();
        if mailing_address.is_empty() {
            return Err(AppError::validation("Mailing address is required"));
        }

        Ok(Self {
            company_name,
            mailing_address,
            website_url: blank_to_none(self.website_url),
            phone_number: blank_to_none(self.phone_number),
            public_email: blank_to_none(self.public_email),
        })
    }
}

fn checked_name(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    let len = value.chars().count() as u64;
    if len < MIN_NAME_LENGTH || len > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "{} must be between {} and {} characters",
            field, MIN_NAME_LENGTH, MAX_NAME_LENGTH
        )));
    }
    Ok(value.to_string())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Kind-specific part of an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountProfile {
    Admin,
    Alumnus(AlumnusProfile),
    Company(CompanyProfile),
}

impl AccountProfile {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountProfile::Admin => AccountKind::Admin,
            AccountProfile::Alumnus(_) => AccountKind::Alumnus,
            AccountProfile::Company(_) => AccountKind::Company,
        }
    }
}

/// Account domain entity
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub login_email: String,
    pub password_hash: String,
    pub profile_photo_file_path: Option<String>,
    pub profile: AccountProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn kind(&self) -> AccountKind {
        self.profile.kind()
    }

    pub fn is_admin(&self) -> bool {
        self.kind() == AccountKind::Admin
    }

    pub fn as_alumnus(&self) -> Option<&AlumnusProfile> {
        match &self.profile {
            AccountProfile::Alumnus(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_company(&self) -> Option<&CompanyProfile> {
        match &self.profile {
            AccountProfile::Company(profile) => Some(profile),
            _ => None,
        }
    }

    /// Human readable name used in notification messages.
    pub fn display_name(&self) -> String {
        match &self.profile {
            AccountProfile::Admin => self.login_email.clone(),
            AccountProfile::Alumnus(p) => format!("{} {}", p.first_name, p.last_name),
            AccountProfile::Company(p) => p.company_name.clone(),
        }
    }

    /// Ensure the account has the expected kind.
    pub fn ensure_kind(&self, kind: AccountKind) -> Result<(), AppError> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Data needed to insert an account with its profile row
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub login_email: String,
    pub password_hash: String,
    pub profile: AccountProfile,
}

/// Partial update of an alumnus account
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AlumnusChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub login_email: Option<String>,
    pub new_password: Option<String>,
}

/// Partial update of a company account
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CompanyChanges {
    pub company_name: Option<String>,
    pub mailing_address: Option<String>,
    pub website_url: Option<String>,
    pub phone_number: Option<String>,
    pub public_email: Option<String>,
    pub login_email: Option<String>,
    pub new_password: Option<String>,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "rob@mail.com")]
    pub login_email: String,
    pub kind: AccountKind,
    pub profile_photo_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alumnus: Option<AlumnusProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let kind = account.kind();
        let (alumnus, company) = match account.profile {
            AccountProfile::Admin => (None, None),
            AccountProfile::Alumnus(p) => (Some(p), None),
            AccountProfile::Company(p) => (None, Some(p)),
        };

        Self {
            id: account.id,
            login_email: account.login_email,
            kind,
            profile_photo_file_path: account.profile_photo_file_path,
            alumnus,
            company,
            created_at: account.created_at,
        }
    }
}

/// Public company card shown to alumni
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanySummary {
    pub id: Uuid,
    #[schema(example = "Sample Company")]
    pub company_name: String,
    pub website_url: Option<String>,
    pub public_email: Option<String>,
    pub profile_photo_file_path: Option<String>,
}

impl CompanySummary {
    /// Build a summary; `None` for non-company accounts.
    pub fn from_account(account: &Account) -> Option<Self> {
        account.as_company().map(|company| Self {
            id: account.id,
            company_name: company.company_name.clone(),
            website_url: company.website_url.clone(),
            public_email: company.public_email.clone(),
            profile_photo_file_path: account.profile_photo_file_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            login_email: "hr@sample.com".to_string(),
            password_hash: "hash".to_string(),
            profile_photo_file_path: None,
            profile: AccountProfile::Company(CompanyProfile {
                company_name: "Sample Company".to_string(),
                mailing_address: "Port of Spain".to_string(),
                website_url: None,
                phone_number: None,
                public_email: None,
            }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_round_trips_through_strings() {
        for kind in [AccountKind::Admin, AccountKind::Alumnus, AccountKind::Company] {
            assert_eq!(kind.as_str().parse::<AccountKind>().unwrap(), kind);
        }
        assert!("manager".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_response_hides_password_and_keeps_profile() {
        let response = AccountResponse::from(company_account());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["kind"], "company");
        assert_eq!(json["company"]["company_name"], "Sample Company");
        assert!(json.get("alumnus").is_none());
    }

    #[test]
    fn test_alumnus_profile_normalized() {
        let profile = AlumnusProfile {
            first_name: "  Rob ".to_string(),
            last_name: "Singh".to_string(),
            phone_number: Some("   ".to_string()),
        }
        .normalized()
        .unwrap();
        assert_eq!(profile.first_name, "Rob");
        assert_eq!(profile.phone_number, None);

        let too_long = AlumnusProfile {
            first_name: "x".repeat(51),
            last_name: "Singh".to_string(),
            phone_number: None,
        };
        assert!(too_long.normalized().is_err());
    }

    #[test]
    fn test_company_profile_requires_name() {
        let profile = CompanyProfile {
            company_name: " ".to_string(),
            mailing_address: "Port of Spain".to_string(),
            website_url: None,
            phone_number: None,
            public_email: None,
        };
        assert!(matches!(profile.normalized(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_ensure_kind() {
        let account = company_account();
        assert!(account.ensure_kind(AccountKind::Company).is_ok());
        assert!(matches!(
            account.ensure_kind(AccountKind::Admin),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_company_summary_only_for_companies() {
        let account = company_account();
        assert_eq!(
            CompanySummary::from_account(&account).unwrap().company_name,
            "Sample Company"
        );

        let admin = Account {
            profile: AccountProfile::Admin,
            ..company_account()
        };
        assert!(CompanySummary::from_account(&admin).is_none());
        assert_eq!(admin.display_name(), "hr@sample.com");
    }
}
