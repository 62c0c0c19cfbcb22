//! Authentication service - registration, login and token verification.
//!
//! Login emails are unique across every account kind, so registration
//! checks the shared accounts table before creating any profile.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    Account, AccountKind, AccountProfile, AlumnusProfile, CompanyProfile, NewAccount, Password,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::utils::normalize_email;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub kind: AccountKind,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register_alumnus(
        &self,
        email: String,
        password: String,
        profile: AlumnusProfile,
    ) -> AppResult<Account>;

    async fn register_company(
        &self,
        email: String,
        password: String,
        profile: CompanyProfile,
    ) -> AppResult<Account>;

    async fn register_admin(&self, email: String, password: String) -> AppResult<Account>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for an account
fn generate_token(account: &Account, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: account.id,
        email: account.login_email.clone(),
        kind: account.kind(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    async fn register(
        &self,
        email: String,
        password: String,
        profile: AccountProfile,
    ) -> AppResult<Account> {
        let login_email = normalize_email(&email)?;
        let password_hash = Password::new(&password)?.into_string();

        if self.uow.accounts().email_exists(&login_email).await? {
            return Err(AppError::conflict("Account"));
        }

        self.uow
            .accounts()
            .create(NewAccount {
                login_email,
                password_hash,
                profile,
            })
            .await
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register_alumnus(
        &self,
        email: String,
        password: String,
        profile: AlumnusProfile,
    ) -> AppResult<Account> {
        let profile = profile.normalized()?;
        self.register(email, password, AccountProfile::Alumnus(profile))
            .await
    }

    async fn register_company(
        &self,
        email: String,
        password: String,
        profile: CompanyProfile,
    ) -> AppResult<Account> {
        let profile = profile.normalized()?;
        if self
            .uow
            .accounts()
            .find_company_by_name(&profile.company_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Company"));
        }
        if self
            .uow
            .accounts()
            .company_contact_taken(
                profile.website_url.clone(),
                profile.phone_number.clone(),
                None,
            )
            .await?
        {
            return Err(AppError::conflict("Company"));
        }

        self.register(email, password, AccountProfile::Company(profile))
            .await
    }

    async fn register_admin(&self, email: String, password: String) -> AppResult<Account> {
        self.register(email, password, AccountProfile::Admin).await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let account = self.uow.accounts().find_by_email(email.trim()).await?;

        // Unknown emails still pay for a hash verification.
        let stored_hash = account.as_ref().map(|a| a.password_hash.as_str());
        if !Password::verify_stored(stored_hash, &password) {
            tracing::debug!("Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let account = account.ok_or(AppError::InvalidCredentials)?;
        tracing::info!(account_id = %account.id, kind = %account.kind(), "Login succeeded");
        generate_token(&account, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{AccountRepository, MockAccountRepository, MockUnitOfWork};

    const SECRET: &str = "a-very-long-test-secret-for-jwt-signing";

    fn authenticator(accounts: MockAccountRepository) -> Authenticator<MockUnitOfWork> {
        let mut uow = MockUnitOfWork::new();
        uow.expect_accounts()
            .return_const(Arc::new(accounts) as Arc<dyn AccountRepository>);
        Authenticator::new(Arc::new(uow), Config::for_tests(SECRET))
    }

    fn stored(new: NewAccount) -> AppResult<Account> {
        Ok(Account {
            id: Uuid::new_v4(),
            login_email: new.login_email,
            password_hash: new.password_hash,
            profile_photo_file_path: None,
            profile: new.profile,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_across_kinds() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_company_by_name()
            .returning(|_| Ok(None));
        accounts
            .expect_company_contact_taken()
            .returning(|_, _, _| Ok(false));
        accounts
            .expect_email_exists()
            .withf(|email| email == "rob@mail.com")
            .returning(|_| Ok(true));
        accounts.expect_create().never();

        let auth = authenticator(accounts);
        let result = auth
            .register_company(
                "rob@mail.com".to_string(),
                "companypass".to_string(),
                CompanyProfile {
                    company_name: "Sample Company".to_string(),
                    mailing_address: "Port of Spain".to_string(),
                    website_url: None,
                    phone_number: None,
                    public_email: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(entity)) if entity == "Account"));
    }

    fn company_profile(website_url: Option<&str>, phone_number: Option<&str>) -> CompanyProfile {
        CompanyProfile {
            company_name: "Sample Company".to_string(),
            mailing_address: "Port of Spain".to_string(),
            website_url: website_url.map(str::to_string),
            phone_number: phone_number.map(str::to_string),
            public_email: None,
        }
    }

    #[tokio::test]
    async fn test_register_company_rejects_taken_website_or_phone() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_company_by_name()
            .returning(|_| Ok(None));
        accounts
            .expect_company_contact_taken()
            .times(2)
            .returning(|website, phone, except| {
                Ok(except.is_none()
                    && (website.as_deref() == Some("https://sample.tt")
                        || phone.as_deref() == Some("868-555-0100")))
            });
        accounts.expect_create().never();

        let auth = authenticator(accounts);
        let by_website = auth
            .register_company(
                "hr@other.com".to_string(),
                "companypass".to_string(),
                company_profile(Some("https://sample.tt"), None),
            )
            .await;
        assert!(matches!(by_website, Err(AppError::Conflict(entity)) if entity == "Company"));

        let by_phone = auth
            .register_company(
                "hr@other.com".to_string(),
                "companypass".to_string(),
                company_profile(None, Some("868-555-0100")),
            )
            .await;
        assert!(matches!(by_phone, Err(AppError::Conflict(entity)) if entity == "Company"));
    }

    #[tokio::test]
    async fn test_register_alumnus_hashes_password() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_email_exists().returning(|_| Ok(false));
        accounts.expect_create().times(1).returning(stored);

        let auth = authenticator(accounts);
        let account = auth
            .register_alumnus(
                " rob@mail.com ".to_string(),
                "robpass123".to_string(),
                AlumnusProfile {
                    first_name: "Rob".to_string(),
                    last_name: "Singh".to_string(),
                    phone_number: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(account.login_email, "rob@mail.com");
        assert_ne!(account.password_hash, "robpass123");
        assert!(Password::from_hash(account.password_hash.clone()).verify("robpass123"));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email() {
        let auth = authenticator(MockAccountRepository::new());
        let result = auth
            .register_admin("bob@mail".to_string(), "bobpass123".to_string())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_and_verify_token() {
        let hash = Password::new("bobpass123").unwrap().into_string();
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_email().returning(move |email| {
            Ok(Some(Account {
                id: Uuid::new_v4(),
                login_email: email.to_string(),
                password_hash: hash.clone(),
                profile_photo_file_path: None,
                profile: AccountProfile::Admin,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });

        let auth = authenticator(accounts);
        let token = auth
            .login("bob@mail.com".to_string(), "bobpass123".to_string())
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.email, "bob@mail.com");
        assert_eq!(claims.kind, AccountKind::Admin);

        let wrong = auth
            .login("bob@mail.com".to_string(), "not-the-password".to_string())
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_email().returning(|_| Ok(None));

        let auth = authenticator(accounts);
        let result = auth
            .login("ghost@mail.com".to_string(), "whatever123".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
