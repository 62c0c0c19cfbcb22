//! Job application service.
//!
//! Submitting and reviewing write the application and the notification about
//! it in one transaction.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::notification_service::commit_with_notifications;
use super::NotificationService;
use crate::domain::{
    Account, AccountKind, ApplicationStatus, Audience, JobApplication, JobListing,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{relative_upload_path, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Apply to an approved listing; one application per alumnus and listing
    async fn apply(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        resume_file_path: String,
        work_experience: Option<String>,
    ) -> AppResult<JobApplication>;

    async fn get_application(&self, alumnus_id: Uuid, listing_id: Uuid)
        -> AppResult<JobApplication>;

    async fn list_for_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<JobApplication>>;

    /// Applications to a listing; visible to the owning company and admins
    async fn list_for_listing(
        &self,
        requester_id: Uuid,
        listing_id: Uuid,
    ) -> AppResult<Vec<JobApplication>>;

    async fn list_all(&self, requester_id: Uuid) -> AppResult<Vec<JobApplication>>;

    async fn update_resume(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        resume_file_path: String,
    ) -> AppResult<JobApplication>;

    /// The owning company's decision; the alumnus is notified
    async fn review(
        &self,
        requester_id: Uuid,
        alumnus_id: Uuid,
        listing_id: Uuid,
        status: ApplicationStatus,
    ) -> AppResult<JobApplication>;

    async fn delete_application(
        &self,
        requester_id: Uuid,
        alumnus_id: Uuid,
        listing_id: Uuid,
    ) -> AppResult<()>;
}

pub struct ApplicationManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn NotificationService>,
}

impl<U: UnitOfWork> ApplicationManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn NotificationService>) -> Self {
        Self { uow, notifier }
    }

    async fn requester(&self, id: Uuid) -> AppResult<Account> {
        self.uow
            .accounts()
            .find_by_id(id)
            .await?
            .ok_or(AppError::Forbidden)
    }

    async fn listing(&self, id: Uuid) -> AppResult<JobListing> {
        self.uow.job_listings().find_by_id(id).await?.ok_or_not_found()
    }
}

#[async_trait]
impl<U: UnitOfWork> ApplicationService for ApplicationManager<U> {
    async fn apply(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        resume_file_path: String,
        work_experience: Option<String>,
    ) -> AppResult<JobApplication> {
        let alumnus = self.requester(alumnus_id).await?;
        alumnus.ensure_kind(AccountKind::Alumnus)?;

        let listing = self.listing(listing_id).await?;
        if !listing.is_approved() {
            return Err(AppError::bad_request(
                "Applications are only accepted for published listings",
            ));
        }

        if self
            .uow
            .applications()
            .find(alumnus_id, listing_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Application"));
        }

        let application =
            JobApplication::new(alumnus_id, listing_id, resume_file_path, work_experience)?;
        let company = self
            .notifier
            .prepare(
                Audience::Company(listing.company_id),
                format!(
                    "{} applied to your listing, {}",
                    alumnus.display_name(),
                    listing.title
                ),
            )
            .await?;

        let tx = self.uow.begin().await?;
        let application = tx.applications().create(application).await?;
        commit_with_notifications(tx, self.notifier.as_ref(), vec![company]).await?;

        tracing::info!(alumnus_id = %alumnus_id, listing_id = %listing_id, "Application submitted");
        Ok(application)
    }

    async fn get_application(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
    ) -> AppResult<JobApplication> {
        self.uow
            .applications()
            .find(alumnus_id, listing_id)
            .await?
            .ok_or_not_found()
    }

    async fn list_for_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<JobApplication>> {
        self.uow.applications().list_by_alumnus(alumnus_id).await
    }

    async fn list_for_listing(
        &self,
        requester_id: Uuid,
        listing_id: Uuid,
    ) -> AppResult<Vec<JobApplication>> {
        let requester = self.requester(requester_id).await?;
        let listing = self.listing(listing_id).await?;
        if !requester.is_admin() && !listing.is_owned_by(requester.id) {
            return Err(AppError::Forbidden);
        }

        self.uow.applications().list_by_listing(listing_id).await
    }

    async fn list_all(&self, requester_id: Uuid) -> AppResult<Vec<JobApplication>> {
        self.requester(requester_id)
            .await?
            .ensure_kind(AccountKind::Admin)?;
        self.uow.applications().list_all().await
    }

    async fn update_resume(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        resume_file_path: String,
    ) -> AppResult<JobApplication> {
        if resume_file_path.trim().is_empty() {
            return Err(AppError::validation("Resume path cannot be empty"));
        }
        relative_upload_path(&resume_file_path)?;
        self.get_application(alumnus_id, listing_id).await?;

        self.uow
            .applications()
            .update_resume(alumnus_id, listing_id, resume_file_path)
            .await
    }

    async fn review(
        &self,
        requester_id: Uuid,
        alumnus_id: Uuid,
        listing_id: Uuid,
        status: ApplicationStatus,
    ) -> AppResult<JobApplication> {
        let company = self.requester(requester_id).await?;
        company.ensure_kind(AccountKind::Company)?;

        let listing = self.listing(listing_id).await?;
        if !listing.is_owned_by(company.id) {
            return Err(AppError::Forbidden);
        }
        self.get_application(alumnus_id, listing_id).await?;

        let applicant = self
            .notifier
            .prepare(
                Audience::Account(alumnus_id),
                format!(
                    "Your application to {} at {} is now {}",
                    listing.title,
                    company.display_name(),
                    status
                ),
            )
            .await?;

        let tx = self.uow.begin().await?;
        let application = tx
            .applications()
            .set_status(alumnus_id, listing_id, status)
            .await?;
        commit_with_notifications(tx, self.notifier.as_ref(), vec![applicant]).await?;

        tracing::info!(
            alumnus_id = %alumnus_id,
            listing_id = %listing_id,
            status = %status,
            "Application reviewed"
        );
        Ok(application)
    }

    async fn delete_application(
        &self,
        requester_id: Uuid,
        alumnus_id: Uuid,
        listing_id: Uuid,
    ) -> AppResult<()> {
        self.requester(requester_id)
            .await?
            .ensure_kind(AccountKind::Admin)?;
        self.uow.applications().delete(alumnus_id, listing_id).await?;
        tracing::info!(alumnus_id = %alumnus_id, listing_id = %listing_id, "Application deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccountProfile, AlumnusProfile, ApprovalStatus, CompanyProfile, Dispatch,
        NewNotification, Notification, PositionType,
    };
    use crate::infra::{
        AccountRepository, JobApplicationRepository, JobListingRepository,
        MockAccountRepository, MockJobApplicationRepository, MockJobListingRepository,
        MockNotificationRepository, MockUnitOfWork, NotificationRepository,
    };
    use crate::services::MockNotificationService;
    use chrono::Utc;

    struct Fixture {
        alumnus: Account,
        company: Account,
        listing: JobListing,
    }

    fn stored(rows: Vec<NewNotification>) -> AppResult<Vec<Notification>> {
        Ok(rows
            .into_iter()
            .map(|n| Notification {
                id: Uuid::new_v4(),
                recipient_id: n.recipient_id,
                message: n.message,
                created_at: Utc::now(),
                reviewed_by_user: false,
            })
            .collect())
    }

    /// Transaction writing applications through `writes`.
    fn transaction(
        writes: MockJobApplicationRepository,
        notifications: MockNotificationRepository,
        commits: usize,
    ) -> MockUnitOfWork {
        let mut tx = MockUnitOfWork::new();
        tx.expect_applications()
            .return_const(Arc::new(writes) as Arc<dyn JobApplicationRepository>);
        tx.expect_notifications()
            .return_const(Arc::new(notifications) as Arc<dyn NotificationRepository>);
        tx.expect_commit().times(commits).returning(|| Ok(()));
        tx
    }

    fn stores_one_notification() -> MockNotificationRepository {
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_create_many()
            .withf(|rows| rows.len() == 1)
            .times(1)
            .returning(stored);
        notifications
    }

    impl Fixture {
        fn new(status: ApprovalStatus) -> Self {
            let now = Utc::now();
            let alumnus = Account {
                id: Uuid::new_v4(),
                login_email: "rob@mail.com".to_string(),
                password_hash: "hash".to_string(),
                profile_photo_file_path: None,
                profile: AccountProfile::Alumnus(AlumnusProfile {
                    first_name: "Rob".to_string(),
                    last_name: "Singh".to_string(),
                    phone_number: None,
                }),
                created_at: now,
                updated_at: now,
            };
            let company = Account {
                id: Uuid::new_v4(),
                login_email: "hr@sample.com".to_string(),
                profile: AccountProfile::Company(CompanyProfile {
                    company_name: "Sample Company".to_string(),
                    mailing_address: "Port of Spain".to_string(),
                    website_url: None,
                    phone_number: None,
                    public_email: None,
                }),
                ..alumnus.clone()
            };
            let listing = JobListing {
                id: Uuid::new_v4(),
                company_id: company.id,
                title: "Junior Developer".to_string(),
                position_type: PositionType::FullTime,
                description: "Write Rust".to_string(),
                monthly_salary_ttd: 8000,
                is_remote: false,
                job_site: "Arima".to_string(),
                admin_approval_status: status,
                created_at: now,
                updated_at: now,
            };
            Self {
                alumnus,
                company,
                listing,
            }
        }

        /// `prepare` answering with the recipient the audience names.
        fn notifier(&self) -> MockNotificationService {
            let all = vec![self.alumnus.clone(), self.company.clone()];
            let mut notifier = MockNotificationService::new();
            notifier.expect_prepare().returning(move |audience, message| {
                let recipients = all
                    .iter()
                    .filter(|a| match audience {
                        Audience::Account(id) | Audience::Company(id) => a.id == id,
                        _ => false,
                    })
                    .cloned()
                    .collect();
                Ok(Dispatch::new(recipients, message))
            });
            notifier
        }

        fn service(
            &self,
            applications: MockJobApplicationRepository,
            tx: Option<MockUnitOfWork>,
            notifier: MockNotificationService,
        ) -> ApplicationManager<MockUnitOfWork> {
            let all = vec![self.alumnus.clone(), self.company.clone()];
            let mut accounts = MockAccountRepository::new();
            accounts
                .expect_find_by_id()
                .returning(move |id| Ok(all.iter().find(|a| a.id == id).cloned()));

            let listing = self.listing.clone();
            let mut listings = MockJobListingRepository::new();
            listings
                .expect_find_by_id()
                .returning(move |id| Ok(Some(listing.clone()).filter(|l| l.id == id)));

            let mut uow = MockUnitOfWork::new();
            uow.expect_accounts()
                .return_const(Arc::new(accounts) as Arc<dyn AccountRepository>);
            uow.expect_job_listings()
                .return_const(Arc::new(listings) as Arc<dyn JobListingRepository>);
            uow.expect_applications()
                .return_const(Arc::new(applications) as Arc<dyn JobApplicationRepository>);
            match tx {
                Some(tx) => {
                    uow.expect_begin()
                        .times(1)
                        .return_once(move || Ok(Box::new(tx) as Box<dyn UnitOfWork>));
                }
                None => {
                    uow.expect_begin().never();
                }
            }
            ApplicationManager::new(Arc::new(uow), Arc::new(notifier))
        }
    }

    #[tokio::test]
    async fn test_apply_to_approved_listing_notifies_company() {
        let fx = Fixture::new(ApprovalStatus::Approved);

        let mut applications = MockJobApplicationRepository::new();
        applications.expect_find().returning(|_, _| Ok(None));

        let mut writes = MockJobApplicationRepository::new();
        writes.expect_create().times(1).returning(Ok);

        let company_id = fx.company.id;
        let mut notifier = fx.notifier();
        notifier
            .expect_deliver()
            .withf(move |dispatches| {
                dispatches.len() == 1
                    && dispatches[0].recipients[0].id == company_id
                    && dispatches[0].message == "Rob Singh applied to your listing, Junior Developer"
            })
            .times(1)
            .returning(|_| ());

        let service = fx.service(
            applications,
            Some(transaction(writes, stores_one_notification(), 1)),
            notifier,
        );
        let application = service
            .apply(
                fx.alumnus.id,
                fx.listing.id,
                "resumes/cv.pdf".to_string(),
                Some("  ".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(application.company_approval_status, ApplicationStatus::Pending);
        assert_eq!(application.work_experience, None);
    }

    #[tokio::test]
    async fn test_failed_notification_insert_leaves_no_application() {
        let fx = Fixture::new(ApprovalStatus::Approved);

        let mut applications = MockJobApplicationRepository::new();
        applications.expect_find().returning(|_, _| Ok(None));

        let mut writes = MockJobApplicationRepository::new();
        writes.expect_create().times(1).returning(Ok);

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_create_many()
            .times(1)
            .returning(|_| Err(AppError::internal("insert failed")));

        let mut notifier = fx.notifier();
        notifier.expect_deliver().never();

        let service = fx.service(
            applications,
            Some(transaction(writes, notifications, 0)),
            notifier,
        );
        let result = service
            .apply(fx.alumnus.id, fx.listing.id, "resumes/cv.pdf".to_string(), None)
            .await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_apply_twice_conflicts() {
        let fx = Fixture::new(ApprovalStatus::Approved);
        let existing =
            JobApplication::new(fx.alumnus.id, fx.listing.id, "resumes/cv.pdf".to_string(), None)
                .unwrap();

        let mut applications = MockJobApplicationRepository::new();
        applications
            .expect_find()
            .returning(move |_, _| Ok(Some(existing.clone())));
        applications.expect_create().never();

        let service = fx.service(applications, None, MockNotificationService::new());
        let result = service
            .apply(fx.alumnus.id, fx.listing.id, "resumes/cv.pdf".to_string(), None)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_apply_to_pending_listing_fails() {
        let fx = Fixture::new(ApprovalStatus::Pending);
        let service = fx.service(
            MockJobApplicationRepository::new(),
            None,
            MockNotificationService::new(),
        );
        let result = service
            .apply(fx.alumnus.id, fx.listing.id, "resumes/cv.pdf".to_string(), None)
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_company_cannot_apply() {
        let fx = Fixture::new(ApprovalStatus::Approved);
        let service = fx.service(
            MockJobApplicationRepository::new(),
            None,
            MockNotificationService::new(),
        );
        let result = service
            .apply(fx.company.id, fx.listing.id, "resumes/cv.pdf".to_string(), None)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_review_notifies_alumnus() {
        let fx = Fixture::new(ApprovalStatus::Approved);
        let pending =
            JobApplication::new(fx.alumnus.id, fx.listing.id, "resumes/cv.pdf".to_string(), None)
                .unwrap();
        let approved = JobApplication {
            company_approval_status: ApplicationStatus::Approved,
            ..pending.clone()
        };

        let mut applications = MockJobApplicationRepository::new();
        applications
            .expect_find()
            .returning(move |_, _| Ok(Some(pending.clone())));

        let mut writes = MockJobApplicationRepository::new();
        writes
            .expect_set_status()
            .times(1)
            .returning(move |_, _, _| Ok(approved.clone()));

        let alumnus_id = fx.alumnus.id;
        let mut notifier = fx.notifier();
        notifier
            .expect_deliver()
            .withf(move |dispatches| {
                dispatches[0].recipients[0].id == alumnus_id
                    && dispatches[0].message.ends_with("is now APPROVED")
            })
            .times(1)
            .returning(|_| ());

        let service = fx.service(
            applications,
            Some(transaction(writes, stores_one_notification(), 1)),
            notifier,
        );
        let reviewed = service
            .review(
                fx.company.id,
                fx.alumnus.id,
                fx.listing.id,
                ApplicationStatus::Approved,
            )
            .await
            .unwrap();
        assert_eq!(reviewed.company_approval_status, ApplicationStatus::Approved);
    }

    #[tokio::test]
    async fn test_update_resume_replaces_path() {
        let fx = Fixture::new(ApprovalStatus::Approved);
        let existing =
            JobApplication::new(fx.alumnus.id, fx.listing.id, "resumes/old.pdf".to_string(), None)
                .unwrap();

        let mut applications = MockJobApplicationRepository::new();
        let found = existing.clone();
        applications
            .expect_find()
            .returning(move |_, _| Ok(Some(found.clone())));
        applications
            .expect_update_resume()
            .withf(|_, _, path| path == "resumes/new.pdf")
            .times(1)
            .returning(move |_, _, path| {
                Ok(JobApplication {
                    resume_file_path: path,
                    ..existing.clone()
                })
            });

        let service = fx.service(applications, None, MockNotificationService::new());
        let updated = service
            .update_resume(fx.alumnus.id, fx.listing.id, "resumes/new.pdf".to_string())
            .await
            .unwrap();
        assert_eq!(updated.resume_file_path, "resumes/new.pdf");
    }

    #[tokio::test]
    async fn test_update_resume_rejects_blank_path_and_missing_application() {
        let fx = Fixture::new(ApprovalStatus::Approved);

        let mut applications = MockJobApplicationRepository::new();
        applications.expect_find().returning(|_, _| Ok(None));
        applications.expect_update_resume().never();

        let service = fx.service(applications, None, MockNotificationService::new());
        let blank = service
            .update_resume(fx.alumnus.id, fx.listing.id, "  ".to_string())
            .await;
        assert!(matches!(blank, Err(AppError::Validation(_))));

        let absolute = service
            .update_resume(fx.alumnus.id, fx.listing.id, "/etc/passwd".to_string())
            .await;
        assert!(matches!(absolute, Err(AppError::Validation(_))));

        let missing = service
            .update_resume(fx.alumnus.id, fx.listing.id, "resumes/new.pdf".to_string())
            .await;
        assert!(matches!(missing, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_application_requires_admin() {
        let fx = Fixture::new(ApprovalStatus::Approved);
        let mut applications = MockJobApplicationRepository::new();
        applications.expect_delete().never();

        let service = fx.service(applications, None, MockNotificationService::new());
        let result = service
            .delete_application(fx.company.id, fx.alumnus.id, fx.listing.id)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
