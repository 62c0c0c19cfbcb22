//! Account service - profile maintenance and admin account management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Account, AccountKind, AccountProfile, AlumnusChanges, CompanyChanges, CompanySummary, Password,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{relative_upload_path, UnitOfWork};
use crate::utils::normalize_email;

/// Account service trait for dependency injection.
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_account(&self, id: Uuid) -> AppResult<Account>;

    async fn get_by_email(&self, email: &str) -> AppResult<Account>;

    /// All accounts, optionally restricted to one kind
    async fn list_accounts(&self, kind: Option<AccountKind>) -> AppResult<Vec<Account>>;

    async fn list_companies(&self) -> AppResult<Vec<CompanySummary>>;

    /// Apply profile changes after verifying `current_password`.
    /// Returns whether anything was actually changed.
    async fn update_alumnus_profile(
        &self,
        id: Uuid,
        current_password: String,
        changes: AlumnusChanges,
    ) -> AppResult<bool>;

    async fn update_company_profile(
        &self,
        id: Uuid,
        current_password: String,
        changes: CompanyChanges,
    ) -> AppResult<bool>;

    async fn update_login_email(
        &self,
        id: Uuid,
        password: String,
        new_email: String,
    ) -> AppResult<Account>;

    async fn update_password(
        &self,
        id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<Account>;

    async fn set_profile_photo(&self, id: Uuid, path: String) -> AppResult<Account>;

    /// Delete `target_id` on behalf of an admin. Admins cannot delete themselves.
    async fn delete_account(&self, requester_id: Uuid, target_id: Uuid) -> AppResult<()>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load an account and check the password.
    async fn authorized(&self, id: Uuid, password: &str) -> AppResult<Account> {
        let account = self.get_account(id).await?;
        if !Password::from_hash(account.password_hash.clone()).verify(password) {
            return Err(AppError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Validate a new login email and make sure nobody else uses it.
    async fn claim_email(&self, account: &Account, new_email: &str) -> AppResult<Option<String>> {
        let new_email = normalize_email(new_email)?;
        if new_email == account.login_email {
            return Ok(None);
        }
        if self.uow.accounts().email_exists(&new_email).await? {
            return Err(AppError::conflict("Account"));
        }
        Ok(Some(new_email))
    }

    /// Apply the shared email/password part of a profile change.
    async fn apply_credentials(
        &self,
        account: &mut Account,
        login_email: Option<String>,
        new_password: Option<String>,
    ) -> AppResult<bool> {
        let mut changed = false;

        if let Some(email) = login_email {
            if let Some(email) = self.claim_email(account, &email).await? {
                account.login_email = email;
                changed = true;
            }
        }

        if let Some(password) = new_password.filter(|p| !p.is_empty()) {
            account.password_hash = Password::new(&password)?.into_string();
            changed = true;
        }

        Ok(changed)
    }
}

/// Overwrite `field` when `value` is present and different.
fn set_if_changed(field: &mut String, value: Option<String>) -> bool {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() && *field != v => {
            *field = v;
            true
        }
        _ => false,
    }
}

/// Same as [`set_if_changed`] for optional fields; a blank value clears it.
fn set_optional_if_changed(field: &mut Option<String>, value: Option<String>) -> bool {
    let Some(value) = value else {
        return false;
    };
    let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
    if *field == value {
        return false;
    }
    *field = value;
    true
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn get_account(&self, id: Uuid) -> AppResult<Account> {
        self.uow.accounts().find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Account> {
        self.uow
            .accounts()
            .find_by_email(email.trim())
            .await?
            .ok_or_not_found()
    }

    async fn list_accounts(&self, kind: Option<AccountKind>) -> AppResult<Vec<Account>> {
        self.uow.accounts().list(kind).await
    }

    async fn list_companies(&self) -> AppResult<Vec<CompanySummary>> {
        let companies = self.uow.accounts().list(Some(AccountKind::Company)).await?;
        Ok(companies.iter().filter_map(CompanySummary::from_account).collect())
    }

    async fn update_alumnus_profile(
        &self,
        id: Uuid,
        current_password: String,
        changes: AlumnusChanges,
    ) -> AppResult<bool> {
        let mut account = self.authorized(id, &current_password).await?;
        let AccountProfile::Alumnus(mut profile) = account.profile.clone() else {
            return Err(AppError::Forbidden);
        };

        let mut changed = set_if_changed(&mut profile.first_name, changes.first_name);
        changed |= set_if_changed(&mut profile.last_name, changes.last_name);
        changed |= set_optional_if_changed(&mut profile.phone_number, changes.phone_number);
        changed |= self
            .apply_credentials(&mut account, changes.login_email, changes.new_password)
            .await?;

        if !changed {
            return Ok(false);
        }

        account.profile = AccountProfile::Alumnus(profile.normalized()?);
        self.uow.accounts().save(account).await?;
        tracing::info!(account_id = %id, "Alumnus profile updated");
        Ok(true)
    }

    async fn update_company_profile(
        &self,
        id: Uuid,
        current_password: String,
        changes: CompanyChanges,
    ) -> AppResult<bool> {
        let mut account = self.authorized(id, &current_password).await?;
        let AccountProfile::Company(mut profile) = account.profile.clone() else {
            return Err(AppError::Forbidden);
        };

        let renamed = changes
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != profile.company_name)
            .map(str::to_string);
        if let Some(name) = &renamed {
            if self.uow.accounts().find_company_by_name(name).await?.is_some() {
                return Err(AppError::conflict("Company"));
            }
        }

        let mut changed = set_if_changed(&mut profile.company_name, renamed);
        changed |= set_if_changed(&mut profile.mailing_address, changes.mailing_address);
        changed |= set_optional_if_changed(&mut profile.website_url, changes.website_url);
        changed |= set_optional_if_changed(&mut profile.phone_number, changes.phone_number);
        changed |= set_optional_if_changed(&mut profile.public_email, changes.public_email);
        changed |= self
            .apply_credentials(&mut account, changes.login_email, changes.new_password)
            .await?;

        if !changed {
            return Ok(false);
        }

        let profile = profile.normalized()?;
        if self
            .uow
            .accounts()
            .company_contact_taken(
                profile.website_url.clone(),
                profile.phone_number.clone(),
                Some(id),
            )
            .await?
        {
            return Err(AppError::conflict("Company"));
        }

        account.profile = AccountProfile::Company(profile);
        self.uow.accounts().save(account).await?;
        tracing::info!(account_id = %id, "Company profile updated");
        Ok(true)
    }

    async fn update_login_email(
        &self,
        id: Uuid,
        password: String,
        new_email: String,
    ) -> AppResult<Account> {
        let mut account = self.authorized(id, &password).await?;
        match self.claim_email(&account, &new_email).await? {
            Some(email) => {
                account.login_email = email;
                self.uow.accounts().save(account).await
            }
            None => Ok(account),
        }
    }

    async fn update_password(
        &self,
        id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<Account> {
        let mut account = self.authorized(id, &current_password).await?;
        if current_password == new_password {
            return Err(AppError::validation(
                "New password must differ from the current password",
            ));
        }
        account.password_hash = Password::new(&new_password)?.into_string();
        self.uow.accounts().save(account).await
    }

    async fn set_profile_photo(&self, id: Uuid, path: String) -> AppResult<Account> {
        let path = path.trim().to_string();
        if path.is_empty() {
            return Err(AppError::validation("Profile photo path cannot be empty"));
        }
        relative_upload_path(&path)?;

        let mut account = self.get_account(id).await?;
        account.profile_photo_file_path = Some(path);
        self.uow.accounts().save(account).await
    }

    async fn delete_account(&self, requester_id: Uuid, target_id: Uuid) -> AppResult<()> {
        let requester = self.get_account(requester_id).await?;
        requester.ensure_kind(AccountKind::Admin)?;

        if requester_id == target_id {
            return Err(AppError::bad_request("Admins cannot delete their own account"));
        }

        self.uow.accounts().delete(target_id).await?;
        tracing::info!(requester = %requester_id, target = %target_id, "Account deleted by admin");
        Ok(())
    }
}
