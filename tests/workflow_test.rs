//! End-to-end service workflows over an in-memory store.
//!
//! The store keeps every table in one mutex-guarded struct and implements
//! all repository traits, so the real service managers run unchanged
//! without PostgreSQL. A transaction works on a copy of the tables that
//! replaces the originals only on commit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use alumni_job_board::config::Config;
use alumni_job_board::domain::{
    Account, AccountKind, AlumnusProfile, ApplicationStatus, ApprovalStatus, CompanyProfile,
    CompanySubscription, JobApplication, JobListing, ListingSearch, ListingWithCompany,
    NewAccount, NewJobListing, NewNotification, Notification, PositionType, SavedJobListing,
};
use alumni_job_board::errors::{AppError, AppResult};
use alumni_job_board::infra::{
    AccountRepository, JobApplicationRepository, JobListingRepository, NotificationRepository,
    SavedListingRepository, SubscriptionRepository, UnitOfWork,
};
use alumni_job_board::jobs::{EmailJob, EmailQueue};
use alumni_job_board::services::{
    AccountManager, AccountService, ApplicationManager, ApplicationService, AuthService,
    Authenticator, ListingManager, ListingService, NotificationService, Notifier,
    SavedListingManager, SavedListingService, SubscriptionManager, SubscriptionService,
};
use alumni_job_board::types::PaginationParams;

// =============================================================================
// In-memory persistence
// =============================================================================

#[derive(Default, Clone)]
struct Tables {
    accounts: Vec<Account>,
    listings: Vec<JobListing>,
    applications: Vec<JobApplication>,
    saved: Vec<SavedJobListing>,
    subscriptions: Vec<CompanySubscription>,
    notifications: Vec<Notification>,
}

#[derive(Default)]
struct MemoryStore {
    tables: Mutex<Tables>,
    /// Make every notification insert fail
    reject_notifications: AtomicBool,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    fn snapshot(&self) -> Self {
        Self {
            tables: Mutex::new(self.with(|t| t.clone())),
            reject_notifications: AtomicBool::new(
                self.reject_notifications.load(Ordering::SeqCst),
            ),
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.with(|t| t.accounts.iter().find(|a| a.id == id).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self.with(|t| t.accounts.iter().find(|a| a.login_email == email).cloned()))
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.with(|t| t.accounts.iter().any(|a| a.login_email == email)))
    }

    async fn find_company_by_name(&self, company_name: &str) -> AppResult<Option<Account>> {
        Ok(self.with(|t| {
            t.accounts
                .iter()
                .find(|a| a.as_company().map(|c| c.company_name.as_str()) == Some(company_name))
                .cloned()
        }))
    }

    async fn company_contact_taken(
        &self,
        website_url: Option<String>,
        phone_number: Option<String>,
        except: Option<Uuid>,
    ) -> AppResult<bool> {
        Ok(self.with(|t| {
            t.accounts
                .iter()
                .filter(|a| Some(a.id) != except)
                .filter_map(Account::as_company)
                .any(|c| {
                    (website_url.is_some() && c.website_url == website_url)
                        || (phone_number.is_some() && c.phone_number == phone_number)
                })
        }))
    }

    async fn create(&self, new: NewAccount) -> AppResult<Account> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            login_email: new.login_email,
            password_hash: new.password_hash,
            profile_photo_file_path: None,
            profile: new.profile,
            created_at: now,
            updated_at: now,
        };
        self.with(|t| {
            if t.accounts.iter().any(|a| a.login_email == account.login_email) {
                return Err(AppError::conflict("Account"));
            }
            t.accounts.push(account.clone());
            Ok(account)
        })
    }

    async fn save(&self, account: Account) -> AppResult<Account> {
        self.with(|t| {
            let slot = t
                .accounts
                .iter_mut()
                .find(|a| a.id == account.id)
                .ok_or(AppError::NotFound)?;
            *slot = account.clone();
            Ok(account)
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            let before = t.accounts.len();
            t.accounts.retain(|a| a.id != id);
            if t.accounts.len() == before {
                return Err(AppError::NotFound);
            }
            t.listings.retain(|l| l.company_id != id);
            t.applications.retain(|a| a.alumnus_id != id);
            t.saved.retain(|s| s.alumnus_id != id);
            t.subscriptions
                .retain(|s| s.alumnus_id != id && s.company_id != id);
            t.notifications.retain(|n| n.recipient_id != id);
            Ok(())
        })
    }

    async fn list(&self, kind: Option<AccountKind>) -> AppResult<Vec<Account>> {
        Ok(self.with(|t| {
            t.accounts
                .iter()
                .filter(|a| kind.map_or(true, |k| a.kind() == k))
                .cloned()
                .collect()
        }))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Account>> {
        Ok(self.with(|t| {
            t.accounts
                .iter()
                .filter(|a| ids.contains(&a.id))
                .cloned()
                .collect()
        }))
    }
}

fn matches_search(listing: &JobListing, company_name: &str, filters: &ListingSearch) -> bool {
    if !listing.is_approved() {
        return false;
    }
    if let Some(term) = filters.term() {
        let term = term.to_lowercase();
        if !listing.title.to_lowercase().contains(&term)
            && !company_name.to_lowercase().contains(&term)
        {
            return false;
        }
    }
    if filters.position_type.is_some_and(|p| p != listing.position_type) {
        return false;
    }
    if let Some(location) = filters.location.as_deref() {
        if listing.job_site != location {
            return false;
        }
    }
    if filters.min_salary.is_some_and(|min| listing.monthly_salary_ttd < min) {
        return false;
    }
    if filters.max_salary.is_some_and(|max| listing.monthly_salary_ttd > max) {
        return false;
    }
    true
}

#[async_trait]
impl JobListingRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobListing>> {
        Ok(self.with(|t| t.listings.iter().find(|l| l.id == id).cloned()))
    }

    async fn create(&self, new: NewJobListing) -> AppResult<JobListing> {
        let now = Utc::now();
        let listing = JobListing {
            id: Uuid::new_v4(),
            company_id: new.company_id,
            title: new.title,
            position_type: new.position_type,
            description: new.description,
            monthly_salary_ttd: new.monthly_salary_ttd,
            is_remote: new.is_remote,
            job_site: new.job_site,
            admin_approval_status: ApprovalStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.with(|t| t.listings.push(listing.clone()));
        Ok(listing)
    }

    async fn set_status(&self, id: Uuid, status: ApprovalStatus) -> AppResult<JobListing> {
        self.with(|t| {
            let listing = t
                .listings
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(AppError::NotFound)?;
            listing.admin_approval_status = status;
            listing.updated_at = Utc::now();
            Ok(listing.clone())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|t| {
            let before = t.listings.len();
            t.listings.retain(|l| l.id != id);
            if t.listings.len() == before {
                return Err(AppError::NotFound);
            }
            t.applications.retain(|a| a.job_listing_id != id);
            t.saved.retain(|s| s.job_listing_id != id);
            Ok(())
        })
    }

    async fn list_all(&self) -> AppResult<Vec<JobListing>> {
        Ok(self.with(|t| t.listings.clone()))
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
        status: Option<ApprovalStatus>,
    ) -> AppResult<Vec<JobListing>> {
        Ok(self.with(|t| {
            t.listings
                .iter()
                .filter(|l| l.company_id == company_id)
                .filter(|l| status.map_or(true, |s| l.admin_approval_status == s))
                .cloned()
                .collect()
        }))
    }

    async fn search(
        &self,
        filters: ListingSearch,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingWithCompany>, u64)> {
        Ok(self.with(|t| {
            let matches: Vec<ListingWithCompany> = t
                .listings
                .iter()
                .filter_map(|listing| {
                    let company_name = t
                        .accounts
                        .iter()
                        .find(|a| a.id == listing.company_id)
                        .and_then(Account::as_company)
                        .map(|c| c.company_name.clone())
                        .unwrap_or_default();
                    matches_search(listing, &company_name, &filters).then(|| ListingWithCompany {
                        listing: listing.clone(),
                        company_name,
                    })
                })
                .collect();
            let total = matches.len() as u64;
            let rows = matches
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect();
            (rows, total)
        }))
    }
}

#[async_trait]
impl JobApplicationRepository for MemoryStore {
    async fn find(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<Option<JobApplication>> {
        Ok(self.with(|t| {
            t.applications
                .iter()
                .find(|a| a.alumnus_id == alumnus_id && a.job_listing_id == listing_id)
                .cloned()
        }))
    }

    async fn create(&self, application: JobApplication) -> AppResult<JobApplication> {
        self.with(|t| {
            if t.applications.iter().any(|a| {
                a.alumnus_id == application.alumnus_id
                    && a.job_listing_id == application.job_listing_id
            }) {
                return Err(AppError::conflict("Application"));
            }
            t.applications.push(application.clone());
            Ok(application)
        })
    }

    async fn update_resume(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        resume_file_path: String,
    ) -> AppResult<JobApplication> {
        self.with(|t| {
            let application = t
                .applications
                .iter_mut()
                .find(|a| a.alumnus_id == alumnus_id && a.job_listing_id == listing_id)
                .ok_or(AppError::NotFound)?;
            application.resume_file_path = resume_file_path;
            Ok(application.clone())
        })
    }

    async fn set_status(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        status: ApplicationStatus,
    ) -> AppResult<JobApplication> {
        self.with(|t| {
            let application = t
                .applications
                .iter_mut()
                .find(|a| a.alumnus_id == alumnus_id && a.job_listing_id == listing_id)
                .ok_or(AppError::NotFound)?;
            application.company_approval_status = status;
            Ok(application.clone())
        })
    }

    async fn delete(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        self.with(|t| {
            let before = t.applications.len();
            t.applications
                .retain(|a| !(a.alumnus_id == alumnus_id && a.job_listing_id == listing_id));
            if t.applications.len() == before {
                Err(AppError::NotFound)
            } else {
                Ok(())
            }
        })
    }

    async fn list_all(&self) -> AppResult<Vec<JobApplication>> {
        Ok(self.with(|t| t.applications.clone()))
    }

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<JobApplication>> {
        Ok(self.with(|t| {
            t.applications
                .iter()
                .filter(|a| a.alumnus_id == alumnus_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_by_listing(&self, listing_id: Uuid) -> AppResult<Vec<JobApplication>> {
        Ok(self.with(|t| {
            t.applications
                .iter()
                .filter(|a| a.job_listing_id == listing_id)
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl SavedListingRepository for MemoryStore {
    async fn find(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<Option<SavedJobListing>> {
        Ok(self.with(|t| {
            t.saved
                .iter()
                .find(|s| s.alumnus_id == alumnus_id && s.job_listing_id == listing_id)
                .cloned()
        }))
    }

    async fn create(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<SavedJobListing> {
        let saved = SavedJobListing {
            alumnus_id,
            job_listing_id: listing_id,
            saved_at: Utc::now(),
        };
        self.with(|t| t.saved.push(saved.clone()));
        Ok(saved)
    }

    async fn delete(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        self.with(|t| {
            let before = t.saved.len();
            t.saved
                .retain(|s| !(s.alumnus_id == alumnus_id && s.job_listing_id == listing_id));
            if t.saved.len() == before {
                Err(AppError::NotFound)
            } else {
                Ok(())
            }
        })
    }

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<SavedJobListing>> {
        Ok(self.with(|t| {
            t.saved
                .iter()
                .filter(|s| s.alumnus_id == alumnus_id)
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn find(
        &self,
        alumnus_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<Option<CompanySubscription>> {
        Ok(self.with(|t| {
            t.subscriptions
                .iter()
                .find(|s| s.alumnus_id == alumnus_id && s.company_id == company_id)
                .cloned()
        }))
    }

    async fn create(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<CompanySubscription> {
        let subscription = CompanySubscription {
            alumnus_id,
            company_id,
            subscribed_at: Utc::now(),
        };
        self.with(|t| t.subscriptions.push(subscription.clone()));
        Ok(subscription)
    }

    async fn delete(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<()> {
        self.with(|t| {
            let before = t.subscriptions.len();
            t.subscriptions
                .retain(|s| !(s.alumnus_id == alumnus_id && s.company_id == company_id));
            if t.subscriptions.len() == before {
                Err(AppError::NotFound)
            } else {
                Ok(())
            }
        })
    }

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<CompanySubscription>> {
        Ok(self.with(|t| {
            t.subscriptions
                .iter()
                .filter(|s| s.alumnus_id == alumnus_id)
                .cloned()
                .collect()
        }))
    }

    async fn list_by_company(&self, company_id: Uuid) -> AppResult<Vec<CompanySubscription>> {
        Ok(self.with(|t| {
            t.subscriptions
                .iter()
                .filter(|s| s.company_id == company_id)
                .cloned()
                .collect()
        }))
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create_many(&self, rows: Vec<NewNotification>) -> AppResult<Vec<Notification>> {
        if self.reject_notifications.load(Ordering::SeqCst) {
            return Err(AppError::internal("notification insert failed"));
        }
        let stored: Vec<Notification> = rows
            .into_iter()
            .map(|row| Notification {
                id: Uuid::new_v4(),
                recipient_id: row.recipient_id,
                message: row.message,
                created_at: Utc::now(),
                reviewed_by_user: false,
            })
            .collect();
        self.with(|t| t.notifications.extend(stored.iter().cloned()));
        Ok(stored)
    }

    async fn list_for_recipient(&self, recipient_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(self.with(|t| {
            t.notifications
                .iter()
                .rev()
                .filter(|n| n.recipient_id == recipient_id)
                .cloned()
                .collect()
        }))
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        Ok(self.with(|t| {
            t.notifications
                .iter()
                .filter(|n| n.recipient_id == recipient_id && !n.reviewed_by_user)
                .count() as u64
        }))
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<Notification> {
        self.with(|t| {
            let notification = t
                .notifications
                .iter_mut()
                .find(|n| n.id == id && n.recipient_id == recipient_id)
                .ok_or(AppError::NotFound)?;
            notification.reviewed_by_user = true;
            Ok(notification.clone())
        })
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        Ok(self.with(|t| {
            let mut changed = 0;
            for n in t
                .notifications
                .iter_mut()
                .filter(|n| n.recipient_id == recipient_id && !n.reviewed_by_user)
            {
                n.reviewed_by_user = true;
                changed += 1;
            }
            changed
        }))
    }
}

struct MemoryUnitOfWork {
    store: Arc<MemoryStore>,
    /// Set on a transaction: the store its tables are written back to
    parent: Option<Arc<MemoryStore>>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.store.clone()
    }

    fn job_listings(&self) -> Arc<dyn JobListingRepository> {
        self.store.clone()
    }

    fn applications(&self) -> Arc<dyn JobApplicationRepository> {
        self.store.clone()
    }

    fn saved_listings(&self) -> Arc<dyn SavedListingRepository> {
        self.store.clone()
    }

    fn subscriptions(&self) -> Arc<dyn SubscriptionRepository> {
        self.store.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        self.store.clone()
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            store: Arc::new(self.store.snapshot()),
            parent: Some(self.store.clone()),
        }))
    }

    async fn commit(&self) -> AppResult<()> {
        if let Some(parent) = &self.parent {
            let staged = self.store.with(|t| t.clone());
            parent.with(|t| *t = staged);
        }
        Ok(())
    }
}

/// Records queued emails instead of sending them.
#[derive(Default)]
struct RecordingQueue {
    sent: Mutex<Vec<EmailJob>>,
}

impl RecordingQueue {
    fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|j| j.to.clone()).collect()
    }
}

#[async_trait]
impl EmailQueue for RecordingQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        self.sent.lock().unwrap().push(job);
        Ok(())
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

struct Board {
    store: Arc<MemoryStore>,
    emails: Arc<RecordingQueue>,
    auth: Authenticator<MemoryUnitOfWork>,
    accounts: AccountManager<MemoryUnitOfWork>,
    listings: ListingManager<MemoryUnitOfWork>,
    applications: ApplicationManager<MemoryUnitOfWork>,
    saved: SavedListingManager<MemoryUnitOfWork>,
    subscriptions: SubscriptionManager<MemoryUnitOfWork>,
    notifications: Arc<dyn NotificationService>,
}

impl Board {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let uow = Arc::new(MemoryUnitOfWork {
            store: store.clone(),
            parent: None,
        });
        let emails = Arc::new(RecordingQueue::default());
        let notifications: Arc<dyn NotificationService> =
            Arc::new(Notifier::new(uow.clone(), emails.clone()));

        Self {
            store,
            emails,
            auth: Authenticator::new(
                uow.clone(),
                Config::for_tests("workflow-test-secret-key-32-chars!!"),
            ),
            accounts: AccountManager::new(uow.clone()),
            listings: ListingManager::new(uow.clone(), notifications.clone()),
            applications: ApplicationManager::new(uow.clone(), notifications.clone()),
            saved: SavedListingManager::new(uow.clone()),
            subscriptions: SubscriptionManager::new(uow),
            notifications,
        }
    }

    async fn admin(&self) -> Account {
        self.auth
            .register_admin("bob@mail.com".to_string(), "bobpass123".to_string())
            .await
            .unwrap()
    }

    async fn alumnus(&self, email: &str) -> Account {
        self.auth
            .register_alumnus(
                email.to_string(),
                "robpass123".to_string(),
                AlumnusProfile {
                    first_name: "Rob".to_string(),
                    last_name: "Singh".to_string(),
                    phone_number: None,
                },
            )
            .await
            .unwrap()
    }

    async fn company(&self, email: &str, name: &str) -> AppResult<Account> {
        self.auth
            .register_company(
                email.to_string(),
                "compass123".to_string(),
                CompanyProfile {
                    company_name: name.to_string(),
                    mailing_address: "Port of Spain".to_string(),
                    website_url: None,
                    phone_number: None,
                    public_email: None,
                },
            )
            .await
    }

    async fn listing(&self, company: &Account, title: &str, salary: i32) -> JobListing {
        let draft = NewJobListing::new(
            company.id,
            title,
            PositionType::FullTime,
            "Build and run services",
            salary,
            false,
            Some("Port of Spain"),
        )
        .unwrap();
        self.listings.create_listing(draft).await.unwrap()
    }
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_duplicate_email_rejected_across_kinds() {
    let board = Board::new();
    board.alumnus("rob@mail.com").await;

    let result = board.company("rob@mail.com", "Sample Company").await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let result = board
        .auth
        .register_admin("rob@mail.com".to_string(), "adminpass123".to_string())
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_company_names_are_unique() {
    let board = Board::new();
    board.company("hr@one.com", "Sample Company").await.unwrap();

    let result = board.company("hr@two.com", "Sample Company").await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_company_website_and_phone_are_unique() {
    let board = Board::new();
    let profile = |name: &str, website: Option<&str>, phone: Option<&str>| CompanyProfile {
        company_name: name.to_string(),
        mailing_address: "Port of Spain".to_string(),
        website_url: website.map(str::to_string),
        phone_number: phone.map(str::to_string),
        public_email: None,
    };
    board
        .auth
        .register_company(
            "hr@one.com".to_string(),
            "compass123".to_string(),
            profile("One Company", Some("https://one.tt"), Some("868-555-0100")),
        )
        .await
        .unwrap();

    let same_website = board
        .auth
        .register_company(
            "hr@two.com".to_string(),
            "compass123".to_string(),
            profile("Two Company", Some("https://one.tt"), None),
        )
        .await;
    assert!(matches!(same_website, Err(AppError::Conflict(entity)) if entity == "Company"));

    let same_phone = board
        .auth
        .register_company(
            "hr@three.com".to_string(),
            "compass123".to_string(),
            profile("Three Company", None, Some("868-555-0100")),
        )
        .await;
    assert!(matches!(same_phone, Err(AppError::Conflict(entity)) if entity == "Company"));
}

#[tokio::test]
async fn test_login_issues_token_with_account_kind() {
    let board = Board::new();
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();

    let token = board
        .auth
        .login("hr@sample.com".to_string(), "compass123".to_string())
        .await
        .unwrap();
    let claims = board.auth.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, company.id);
    assert_eq!(claims.kind, AccountKind::Company);

    let wrong = board
        .auth
        .login("hr@sample.com".to_string(), "not-the-password".to_string())
        .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_admin_deletes_account_but_not_itself() {
    let board = Board::new();
    let admin = board.admin().await;
    let alumnus = board.alumnus("rob@mail.com").await;

    let result = board.accounts.delete_account(alumnus.id, admin.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let result = board.accounts.delete_account(admin.id, admin.id).await;
    assert!(result.is_err());

    board.accounts.delete_account(admin.id, alumnus.id).await.unwrap();
    assert!(matches!(
        board.accounts.get_account(alumnus.id).await,
        Err(AppError::NotFound)
    ));
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn test_new_listing_is_pending_and_notifies_admins() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();

    let listing = board.listing(&company, "Junior Developer", 8000).await;
    assert_eq!(listing.admin_approval_status, ApprovalStatus::Pending);

    let inbox = board.notifications.list_for(admin.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].message.contains("Junior Developer"));
    assert_eq!(board.emails.recipients(), vec!["bob@mail.com".to_string()]);
}

#[tokio::test]
async fn test_only_admins_delete_listings() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let listing = board.listing(&company, "Junior Developer", 8000).await;

    let result = board.listings.delete_listing(company.id, listing.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    board
        .listings
        .delete_listing(admin.id, listing.id)
        .await
        .unwrap();
    assert!(matches!(
        board.listings.get_listing(listing.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_set_status_changes_stored_status() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let listing = board.listing(&company, "Junior Developer", 8000).await;

    for status in [ApprovalStatus::Approved, ApprovalStatus::DeletionRequested] {
        board
            .listings
            .set_approval_status(admin.id, listing.id, status)
            .await
            .unwrap();
        let stored = board.listings.get_listing(listing.id).await.unwrap();
        assert_eq!(stored.admin_approval_status.as_str(), status.as_str());
    }
}

#[tokio::test]
async fn test_search_only_returns_published_matches() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let published = board.listing(&company, "Junior Developer", 8000).await;
    board.listing(&company, "Senior Developer", 15000).await;
    board.listings.publish(admin.id, published.id).await.unwrap();

    let by_company = ListingSearch {
        q: Some("sample".to_string()),
        ..Default::default()
    };
    let (rows, total) = board
        .listings
        .search(by_company, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].listing.id, published.id);
    assert_eq!(rows[0].company_name, "Sample Company");

    let inclusive_bounds = ListingSearch {
        min_salary: Some(8000),
        max_salary: Some(8000),
        ..Default::default()
    };
    let (_, total) = board
        .listings
        .search(inclusive_bounds, PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 1);

    let inverted = ListingSearch {
        min_salary: Some(9000),
        max_salary: Some(100),
        ..Default::default()
    };
    let result = board
        .listings
        .search(inverted, PaginationParams::default())
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

// =============================================================================
// Subscriptions, applications and saved listings
// =============================================================================

#[tokio::test]
async fn test_publishing_notifies_company_and_subscribers() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let rob = board.alumnus("rob@mail.com").await;
    let sam = board.alumnus("sam@mail.com").await;

    let outcome = board
        .subscriptions
        .subscribe(rob.id, vec![company.id, company.id])
        .await
        .unwrap();
    assert_eq!(outcome.added, vec![company.id]);
    assert!(board
        .subscriptions
        .is_subscribed(rob.id, company.id)
        .await
        .unwrap());

    let listing = board.listing(&company, "Junior Developer", 8000).await;
    board.listings.publish(admin.id, listing.id).await.unwrap();

    let rob_inbox = board.notifications.list_for(rob.id).await.unwrap();
    assert_eq!(rob_inbox.len(), 1);
    assert_eq!(
        rob_inbox[0].message,
        "Sample Company posted a new listing, Junior Developer!"
    );
    assert!(board.notifications.list_for(sam.id).await.unwrap().is_empty());
    assert_eq!(board.notifications.unread_count(company.id).await.unwrap(), 1);
    assert!(board.emails.recipients().contains(&"rob@mail.com".to_string()));
}

#[tokio::test]
async fn test_application_lifecycle() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let rob = board.alumnus("rob@mail.com").await;
    let listing = board.listing(&company, "Junior Developer", 8000).await;

    let early = board
        .applications
        .apply(rob.id, listing.id, "resumes/cv.pdf".to_string(), None)
        .await;
    assert!(matches!(early, Err(AppError::BadRequest(_))));

    board.listings.publish(admin.id, listing.id).await.unwrap();
    let application = board
        .applications
        .apply(
            rob.id,
            listing.id,
            "resumes/cv.pdf".to_string(),
            Some("Two years of Rust".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(application.company_approval_status, ApplicationStatus::Pending);

    let again = board
        .applications
        .apply(rob.id, listing.id, "resumes/cv.pdf".to_string(), None)
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let reviewed = board
        .applications
        .review(company.id, rob.id, listing.id, ApplicationStatus::Approved)
        .await
        .unwrap();
    assert_eq!(reviewed.company_approval_status, ApplicationStatus::Approved);

    let inbox = board.notifications.list_for(rob.id).await.unwrap();
    assert!(inbox[0].message.contains("APPROVED"));
    assert_eq!(board.notifications.mark_all_read(rob.id).await.unwrap(), 1);
    assert_eq!(board.notifications.unread_count(rob.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_notification_leaves_no_application() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let rob = board.alumnus("rob@mail.com").await;
    let listing = board.listing(&company, "Junior Developer", 8000).await;
    board.listings.publish(admin.id, listing.id).await.unwrap();
    let emails_before = board.emails.recipients().len();

    board.store.reject_notifications.store(true, Ordering::SeqCst);
    let result = board
        .applications
        .apply(rob.id, listing.id, "resumes/cv.pdf".to_string(), None)
        .await;
    assert!(result.is_err());

    assert!(board.applications.list_for_alumnus(rob.id).await.unwrap().is_empty());
    assert_eq!(board.emails.recipients().len(), emails_before);

    board.store.reject_notifications.store(false, Ordering::SeqCst);
    board
        .applications
        .apply(rob.id, listing.id, "resumes/cv.pdf".to_string(), None)
        .await
        .unwrap();
    assert_eq!(board.applications.list_for_alumnus(rob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_notification_leaves_listing_status_unchanged() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let listing = board.listing(&company, "Junior Developer", 8000).await;

    board.store.reject_notifications.store(true, Ordering::SeqCst);
    assert!(board.listings.publish(admin.id, listing.id).await.is_err());

    let stored = board.listings.get_listing(listing.id).await.unwrap();
    assert_eq!(stored.admin_approval_status, ApprovalStatus::Pending);
    assert!(board.notifications.list_for(company.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_read_only_touches_own_notifications() {
    let board = Board::new();
    let admin = board.admin().await;
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    board.listing(&company, "Junior Developer", 8000).await;

    let inbox = board.notifications.list_for(admin.id).await.unwrap();
    let result = board.notifications.mark_read(company.id, inbox[0].id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
    assert_eq!(board.notifications.unread_count(admin.id).await.unwrap(), 1);

    let read = board.notifications.mark_read(admin.id, inbox[0].id).await.unwrap();
    assert!(read.reviewed_by_user);
    assert_eq!(board.notifications.unread_count(admin.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_saving_a_listing_twice_conflicts() {
    let board = Board::new();
    let company = board.company("hr@sample.com", "Sample Company").await.unwrap();
    let rob = board.alumnus("rob@mail.com").await;
    let listing = board.listing(&company, "Junior Developer", 8000).await;

    board.saved.save(rob.id, listing.id).await.unwrap();
    let again = board.saved.save(rob.id, listing.id).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert_eq!(
        board.saved.saved_listing_ids(rob.id).await.unwrap(),
        vec![listing.id]
    );

    let by_company = board.saved.save(company.id, listing.id).await;
    assert!(matches!(by_company, Err(AppError::Forbidden)));

    board.saved.remove(rob.id, rob.id, listing.id).await.unwrap();
    assert!(board.saved.list_for_alumnus(rob.id).await.unwrap().is_empty());
}
