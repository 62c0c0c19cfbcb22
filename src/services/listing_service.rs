//! Job listing service - posting, moderation and search.
//!
//! Admins move listings between approval states; companies can only ask for
//! deletion or an update. Each state change and the notifications about it
//! are written in one transaction.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::notification_service::commit_with_notifications;
use super::NotificationService;
use crate::domain::{
    Account, AccountKind, ApprovalStatus, Audience, Dispatch, JobListing, ListingSearch,
    ListingWithCompany, NewJobListing,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[async_trait]
pub trait ListingService: Send + Sync {
    /// Create a listing for the company named in `listing`; starts `PENDING`
    async fn create_listing(&self, listing: NewJobListing) -> AppResult<JobListing>;

    async fn get_listing(&self, id: Uuid) -> AppResult<JobListing>;

    /// Every listing in any state (admin view)
    async fn list_all(&self, requester_id: Uuid) -> AppResult<Vec<JobListing>>;

    /// All of a company's listings regardless of state
    async fn list_for_company(&self, company_id: Uuid) -> AppResult<Vec<JobListing>>;

    /// A company's publicly visible listings
    async fn list_approved_for_company(&self, company_id: Uuid) -> AppResult<Vec<JobListing>>;

    async fn search(
        &self,
        filters: ListingSearch,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingWithCompany>, u64)>;

    async fn set_approval_status(
        &self,
        requester_id: Uuid,
        id: Uuid,
        status: ApprovalStatus,
    ) -> AppResult<JobListing>;

    async fn publish(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing>;

    async fn unpublish(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing>;

    async fn reject(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing>;

    async fn request_deletion(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing>;

    async fn request_update(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing>;

    async fn delete_listing(&self, requester_id: Uuid, id: Uuid) -> AppResult<()>;
}

pub struct ListingManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn NotificationService>,
}

impl<U: UnitOfWork> ListingManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn NotificationService>) -> Self {
        Self { uow, notifier }
    }

    async fn account_of_kind(&self, id: Uuid, kind: AccountKind) -> AppResult<Account> {
        let account = self
            .uow
            .accounts()
            .find_by_id(id)
            .await?
            .ok_or(AppError::Forbidden)?;
        account.ensure_kind(kind)?;
        Ok(account)
    }

    async fn company_name(&self, company_id: Uuid) -> AppResult<String> {
        let company = self.uow.accounts().find_by_id(company_id).await?;
        Ok(company
            .as_ref()
            .and_then(Account::as_company)
            .map(|c| c.company_name.clone())
            .unwrap_or_default())
    }

    /// Admin check, then the listing being moderated.
    async fn moderation_target(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing> {
        self.account_of_kind(requester_id, AccountKind::Admin).await?;
        self.get_listing(id).await
    }

    /// Set the status and store `dispatches` in one transaction.
    async fn write_status(
        &self,
        requester_id: Uuid,
        id: Uuid,
        status: ApprovalStatus,
        dispatches: Vec<Dispatch>,
    ) -> AppResult<JobListing> {
        let tx = self.uow.begin().await?;
        let listing = tx.job_listings().set_status(id, status).await?;
        commit_with_notifications(tx, self.notifier.as_ref(), dispatches).await?;

        tracing::info!(
            listing_id = %id,
            status = %status,
            requester = %requester_id,
            "Listing approval status changed"
        );
        Ok(listing)
    }

    /// Company-only request on its own listing.
    async fn owner_request(
        &self,
        requester_id: Uuid,
        id: Uuid,
        status: ApprovalStatus,
        verb: &str,
    ) -> AppResult<JobListing> {
        let company = self.account_of_kind(requester_id, AccountKind::Company).await?;
        let listing = self.get_listing(id).await?;
        if !listing.is_owned_by(company.id) {
            return Err(AppError::Forbidden);
        }

        let admins = self
            .notifier
            .prepare(
                Audience::Admins,
                format!(
                    "{} requested {} to be {}",
                    company.display_name(),
                    listing.title,
                    verb
                ),
            )
            .await?;
        self.write_status(requester_id, id, status, vec![admins]).await
    }
}

#[async_trait]
impl<U: UnitOfWork> ListingService for ListingManager<U> {
    async fn create_listing(&self, listing: NewJobListing) -> AppResult<JobListing> {
        let company = self
            .account_of_kind(listing.company_id, AccountKind::Company)
            .await?;
        let admins = self
            .notifier
            .prepare(
                Audience::Admins,
                format!(
                    "{} created a new listing, {}, which is awaiting approval",
                    company.display_name(),
                    listing.title
                ),
            )
            .await?;

        let tx = self.uow.begin().await?;
        let listing = tx.job_listings().create(listing).await?;
        commit_with_notifications(tx, self.notifier.as_ref(), vec![admins]).await?;

        tracing::info!(listing_id = %listing.id, company_id = %company.id, "Listing created");
        Ok(listing)
    }

    async fn get_listing(&self, id: Uuid) -> AppResult<JobListing> {
        self.uow.job_listings().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_all(&self, requester_id: Uuid) -> AppResult<Vec<JobListing>> {
        self.account_of_kind(requester_id, AccountKind::Admin).await?;
        self.uow.job_listings().list_all().await
    }

    async fn list_for_company(&self, company_id: Uuid) -> AppResult<Vec<JobListing>> {
        self.uow.job_listings().list_by_company(company_id, None).await
    }

    async fn list_approved_for_company(&self, company_id: Uuid) -> AppResult<Vec<JobListing>> {
        self.uow
            .job_listings()
            .list_by_company(company_id, Some(ApprovalStatus::Approved))
            .await
    }

    async fn search(
        &self,
        filters: ListingSearch,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingWithCompany>, u64)> {
        filters.validate()?;
        self.uow.job_listings().search(filters, page).await
    }

    async fn set_approval_status(
        &self,
        requester_id: Uuid,
        id: Uuid,
        status: ApprovalStatus,
    ) -> AppResult<JobListing> {
        self.moderation_target(requester_id, id).await?;
        self.write_status(requester_id, id, status, Vec::new()).await
    }

    async fn publish(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing> {
        let listing = self.moderation_target(requester_id, id).await?;
        let company_name = self.company_name(listing.company_id).await?;

        let owner = self
            .notifier
            .prepare(
                Audience::Company(listing.company_id),
                format!("Your job listing, {} has been published!", listing.title),
            )
            .await?;
        let subscribers = self
            .notifier
            .prepare(
                Audience::Subscribers(listing.company_id),
                format!("{} posted a new listing, {}!", company_name, listing.title),
            )
            .await?;
        self.write_status(requester_id, id, ApprovalStatus::Approved, vec![owner, subscribers])
            .await
    }

    async fn unpublish(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing> {
        self.set_approval_status(requester_id, id, ApprovalStatus::Pending)
            .await
    }

    async fn reject(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing> {
        let listing = self.moderation_target(requester_id, id).await?;
        let owner = self
            .notifier
            .prepare(
                Audience::Company(listing.company_id),
                format!("Your job listing, {} has been rejected.", listing.title),
            )
            .await?;
        self.write_status(requester_id, id, ApprovalStatus::Rejected, vec![owner])
            .await
    }

    async fn request_deletion(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing> {
        self.owner_request(requester_id, id, ApprovalStatus::DeletionRequested, "deleted")
            .await
    }

    async fn request_update(&self, requester_id: Uuid, id: Uuid) -> AppResult<JobListing> {
        self.owner_request(requester_id, id, ApprovalStatus::UpdateRequested, "updated")
            .await
    }

    async fn delete_listing(&self, requester_id: Uuid, id: Uuid) -> AppResult<()> {
        let listing = self.moderation_target(requester_id, id).await?;
        let company_name = self.company_name(listing.company_id).await?;
        let owner = self
            .notifier
            .prepare(
                Audience::Company(listing.company_id),
                format!(
                    "Ahoy {}! Your listing, {}, has been deleted!",
                    company_name, listing.title
                ),
            )
            .await?;

        let tx = self.uow.begin().await?;
        tx.job_listings().delete(id).await?;
        commit_with_notifications(tx, self.notifier.as_ref(), vec![owner]).await?;

        tracing::info!(listing_id = %id, requester = %requester_id, "Listing deleted");
        Ok(())
    }
}
