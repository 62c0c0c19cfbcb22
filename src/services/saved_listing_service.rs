//! Saved listing service - an alumnus' bookmarks.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AccountKind, SavedJobListing};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait SavedListingService: Send + Sync {
    async fn save(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<SavedJobListing>;

    async fn list_for_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<SavedJobListing>>;

    async fn saved_listing_ids(&self, alumnus_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Remove a bookmark; allowed for the alumnus itself or an admin
    async fn remove(&self, requester_id: Uuid, alumnus_id: Uuid, listing_id: Uuid)
        -> AppResult<()>;
}

pub struct SavedListingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SavedListingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SavedListingService for SavedListingManager<U> {
    async fn save(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<SavedJobListing> {
        self.uow
            .accounts()
            .find_by_id(alumnus_id)
            .await?
            .ok_or(AppError::Forbidden)?
            .ensure_kind(AccountKind::Alumnus)?;

        if self.uow.job_listings().find_by_id(listing_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if self
            .uow
            .saved_listings()
            .find(alumnus_id, listing_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Saved listing"));
        }

        self.uow.saved_listings().create(alumnus_id, listing_id).await
    }

    async fn list_for_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<SavedJobListing>> {
        self.uow.saved_listings().list_by_alumnus(alumnus_id).await
    }

    async fn saved_listing_ids(&self, alumnus_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .list_for_alumnus(alumnus_id)
            .await?
            .into_iter()
            .map(|saved| saved.job_listing_id)
            .collect())
    }

    async fn remove(
        &self,
        requester_id: Uuid,
        alumnus_id: Uuid,
        listing_id: Uuid,
    ) -> AppResult<()> {
        if requester_id != alumnus_id {
            self.uow
                .accounts()
                .find_by_id(requester_id)
                .await?
                .ok_or(AppError::Forbidden)?
                .ensure_kind(AccountKind::Admin)?;
        }

        self.uow.saved_listings().delete(alumnus_id, listing_id).await
    }
}
