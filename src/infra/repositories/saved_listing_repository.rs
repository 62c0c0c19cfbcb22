//! Saved job listing repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::saved_job_listing;
use crate::domain::SavedJobListing;
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::Connection;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SavedListingRepository: Send + Sync {
    async fn find(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<Option<SavedJobListing>>;

    async fn create(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<SavedJobListing>;

    async fn delete(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<()>;

    /// Newest saves first
    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<SavedJobListing>>;
}

pub struct SavedListingStore {
    db: Connection,
}

impl SavedListingStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SavedListingRepository for SavedListingStore {
    async fn find(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<Option<SavedJobListing>> {
        let model = saved_job_listing::Entity::find_by_id((alumnus_id, listing_id))
            .one(&self.db)
            .await?;
        Ok(model.map(SavedJobListing::from))
    }

    async fn create(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<SavedJobListing> {
        let model = saved_job_listing::ActiveModel {
            alumnus_id: Set(alumnus_id),
            job_listing_id: Set(listing_id),
            saved_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Saved listing"))?;

        Ok(SavedJobListing::from(model))
    }

    async fn delete(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        let result = saved_job_listing::Entity::delete_by_id((alumnus_id, listing_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<SavedJobListing>> {
        let models = saved_job_listing::Entity::find()
            .filter(saved_job_listing::Column::AlumnusId.eq(alumnus_id))
            .order_by_desc(saved_job_listing::Column::SavedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(SavedJobListing::from).collect())
    }
}
