//! Company subscription repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::company_subscription;
use crate::domain::CompanySubscription;
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::Connection;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<Option<CompanySubscription>>;

    async fn create(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<CompanySubscription>;

    async fn delete(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<()>;

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<CompanySubscription>>;

    /// Everyone following a company
    async fn list_by_company(&self, company_id: Uuid) -> AppResult<Vec<CompanySubscription>>;
}

pub struct SubscriptionStore {
    db: Connection,
}

impl SubscriptionStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionStore {
    async fn find(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<Option<CompanySubscription>> {
        let model = company_subscription::Entity::find_by_id((alumnus_id, company_id))
            .one(&self.db)
            .await?;
        Ok(model.map(CompanySubscription::from))
    }

    async fn create(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<CompanySubscription> {
        let model = company_subscription::ActiveModel {
            alumnus_id: Set(alumnus_id),
            company_id: Set(company_id),
            subscribed_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Subscription"))?;

        Ok(CompanySubscription::from(model))
    }

    async fn delete(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<()> {
        let result = company_subscription::Entity::delete_by_id((alumnus_id, company_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<CompanySubscription>> {
        let models = company_subscription::Entity::find()
            .filter(company_subscription::Column::AlumnusId.eq(alumnus_id))
            .order_by_asc(company_subscription::Column::SubscribedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(CompanySubscription::from).collect())
    }

    async fn list_by_company(&self, company_id: Uuid) -> AppResult<Vec<CompanySubscription>> {
        let models = company_subscription::Entity::find()
            .filter(company_subscription::Column::CompanyId.eq(company_id))
            .order_by_asc(company_subscription::Column::SubscribedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(CompanySubscription::from).collect())
    }
}
