//! Account repository: accounts plus their kind-specific profile rows.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, ConnectionTrait,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{account, alumnus_profile, company_profile};
use crate::domain::{Account, AccountKind, AccountProfile, NewAccount};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::{with_transaction, Connection};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account (with profile) by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by login email, whatever its kind
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Whether any account of any kind already uses this email
    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Find the company account owning a company name
    async fn find_company_by_name(&self, company_name: &str) -> AppResult<Option<Account>>;

    /// Whether a company other than `except` already lists this website or phone
    async fn company_contact_taken(
        &self,
        website_url: Option<String>,
        phone_number: Option<String>,
        except: Option<Uuid>,
    ) -> AppResult<bool>;

    /// Insert the account row and its profile row atomically
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Persist email, password, photo and profile fields
    async fn save(&self, account: Account) -> AppResult<Account>;

    /// Delete account; owned rows cascade
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List accounts, optionally restricted to one kind
    async fn list(&self, kind: Option<AccountKind>) -> AppResult<Vec<Account>>;

    /// Fetch several accounts at once (unknown IDs are skipped)
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Account>>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: Connection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: Connection) -> Self {
        Self { db }
    }

    /// Attach profile rows to account rows with two batched lookups.
    async fn hydrate(&self, models: Vec<account::Model>) -> AppResult<Vec<Account>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

        let mut alumni: HashMap<Uuid, alumnus_profile::Model> = alumnus_profile::Entity::find()
            .filter(alumnus_profile::Column::AccountId.is_in(ids.clone()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.account_id, p))
            .collect();

        let mut companies: HashMap<Uuid, company_profile::Model> = company_profile::Entity::find()
            .filter(company_profile::Column::AccountId.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.account_id, p))
            .collect();

        models
            .into_iter()
            .map(|model| {
                let profile = match model.kind.parse::<AccountKind>()? {
                    AccountKind::Admin => AccountProfile::Admin,
                    AccountKind::Alumnus => alumni
                        .remove(&model.id)
                        .map(|p| AccountProfile::Alumnus(p.into()))
                        .ok_or_else(|| missing_profile(model.id))?,
                    AccountKind::Company => companies
                        .remove(&model.id)
                        .map(|p| AccountProfile::Company(p.into()))
                        .ok_or_else(|| missing_profile(model.id))?,
                };
                Ok(into_domain(model, profile))
            })
            .collect()
    }

    async fn hydrate_one(&self, model: Option<account::Model>) -> AppResult<Option<Account>> {
        match model {
            Some(model) => Ok(self.hydrate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }
}

fn missing_profile(id: Uuid) -> AppError {
    AppError::internal(format!("Account {} has no profile row", id))
}

fn into_domain(model: account::Model, profile: AccountProfile) -> Account {
    Account {
        id: model.id,
        login_email: model.login_email,
        password_hash: model.password_hash,
        profile_photo_file_path: model.profile_photo_file_path,
        profile,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

async fn insert_profile<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    profile: &AccountProfile,
) -> AppResult<()> {
    match profile {
        AccountProfile::Admin => {}
        AccountProfile::Alumnus(p) => {
            alumnus_profile::ActiveModel {
                account_id: Set(account_id),
                first_name: Set(p.first_name.clone()),
                last_name: Set(p.last_name.clone()),
                phone_number: Set(p.phone_number.clone()),
            }
            .insert(conn)
            .await
            .map_err(|e| AppError::from_write(e, "Alumnus"))?;
        }
        AccountProfile::Company(p) => {
            company_profile::ActiveModel {
                account_id: Set(account_id),
                company_name: Set(p.company_name.clone()),
                mailing_address: Set(p.mailing_address.clone()),
                website_url: Set(p.website_url.clone()),
                phone_number: Set(p.phone_number.clone()),
                public_email: Set(p.public_email.clone()),
            }
            .insert(conn)
            .await
            .map_err(|e| AppError::from_write(e, "Company"))?;
        }
    }
    Ok(())
}

async fn update_profile<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    profile: &AccountProfile,
) -> AppResult<()> {
    match profile {
        AccountProfile::Admin => {}
        AccountProfile::Alumnus(p) => {
            alumnus_profile::ActiveModel {
                account_id: Unchanged(account_id),
                first_name: Set(p.first_name.clone()),
                last_name: Set(p.last_name.clone()),
                phone_number: Set(p.phone_number.clone()),
            }
            .update(conn)
            .await
            .map_err(|e| AppError::from_write(e, "Alumnus"))?;
        }
        AccountProfile::Company(p) => {
            company_profile::ActiveModel {
                account_id: Unchanged(account_id),
                company_name: Set(p.company_name.clone()),
                mailing_address: Set(p.mailing_address.clone()),
                website_url: Set(p.website_url.clone()),
                phone_number: Set(p.phone_number.clone()),
                public_email: Set(p.public_email.clone()),
            }
            .update(conn)
            .await
            .map_err(|e| AppError::from_write(e, "Company"))?;
        }
    }
    Ok(())
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let model = account::Entity::find_by_id(id).one(&self.db).await?;
        self.hydrate_one(model).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let model = account::Entity::find()
            .filter(account::Column::LoginEmail.eq(email))
            .one(&self.db)
            .await?;
        self.hydrate_one(model).await
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = account::Entity::find()
            .filter(account::Column::LoginEmail.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_company_by_name(&self, company_name: &str) -> AppResult<Option<Account>> {
        let profile = company_profile::Entity::find()
            .filter(company_profile::Column::CompanyName.eq(company_name))
            .one(&self.db)
            .await?;

        match profile {
            Some(profile) => self.find_by_id(profile.account_id).await,
            None => Ok(None),
        }
    }

    async fn company_contact_taken(
        &self,
        website_url: Option<String>,
        phone_number: Option<String>,
        except: Option<Uuid>,
    ) -> AppResult<bool> {
        if website_url.is_none() && phone_number.is_none() {
            return Ok(false);
        }

        let contact = Condition::any()
            .add_option(website_url.map(|w| company_profile::Column::WebsiteUrl.eq(w)))
            .add_option(phone_number.map(|p| company_profile::Column::PhoneNumber.eq(p)));
        let mut query = company_profile::Entity::find().filter(contact);
        if let Some(id) = except {
            query = query.filter(company_profile::Column::AccountId.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    async fn create(&self, new: NewAccount) -> AppResult<Account> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let kind = new.profile.kind();

        let model = with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let model = account::ActiveModel {
                    id: Set(id),
                    login_email: Set(new.login_email),
                    password_hash: Set(new.password_hash),
                    profile_photo_file_path: Set(None),
                    kind: Set(kind.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(|e| AppError::from_write(e, "Account"))?;

                insert_profile(txn, id, &new.profile).await?;
                Ok((model, new.profile))
            })
        })
        .await;

        let (model, profile) = model?;
        tracing::info!(account_id = %id, kind = %kind, "Account created");
        Ok(into_domain(model, profile))
    }

    async fn save(&self, account: Account) -> AppResult<Account> {
        let now = Utc::now();

        with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let model = account::ActiveModel {
                    id: Unchanged(account.id),
                    login_email: Set(account.login_email.clone()),
                    password_hash: Set(account.password_hash.clone()),
                    profile_photo_file_path: Set(account.profile_photo_file_path.clone()),
                    kind: Unchanged(account.kind().as_str().to_string()),
                    created_at: Unchanged(account.created_at),
                    updated_at: Set(now),
                }
                .update(txn)
                .await
                .map_err(|e| AppError::from_write(e, "Account"))?;

                update_profile(txn, account.id, &account.profile).await?;
                Ok(into_domain(model, account.profile))
            })
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = account::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }

    async fn list(&self, kind: Option<AccountKind>) -> AppResult<Vec<Account>> {
        let mut query = account::Entity::find().order_by_asc(account::Column::CreatedAt);
        if let Some(kind) = kind {
            query = query.filter(account::Column::Kind.eq(kind.as_str()));
        }

        let models = query.all(&self.db).await?;
        self.hydrate(models).await
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = account::Entity::find()
            .filter(account::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        self.hydrate(models).await
    }
}
