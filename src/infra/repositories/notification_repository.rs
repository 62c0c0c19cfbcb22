//! Notification repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::notification;
use crate::domain::{NewNotification, Notification};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::unit_of_work::{with_transaction, Connection};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store one row per recipient; either all rows are written or none
    async fn create_many(&self, notifications: Vec<NewNotification>) -> AppResult<Vec<Notification>>;

    /// Newest first
    async fn list_for_recipient(&self, recipient_id: Uuid) -> AppResult<Vec<Notification>>;

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Mark one notification read; `NotFound` unless it belongs to the recipient
    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<Notification>;

    /// Returns how many notifications changed
    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;
}

pub struct NotificationStore {
    db: Connection,
}

impl NotificationStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn create_many(&self, notifications: Vec<NewNotification>) -> AppResult<Vec<Notification>> {
        if notifications.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let stored: Vec<Notification> = notifications
            .into_iter()
            .map(|n| Notification {
                id: Uuid::new_v4(),
                recipient_id: n.recipient_id,
                message: n.message,
                created_at: now,
                reviewed_by_user: false,
            })
            .collect();

        let rows: Vec<notification::ActiveModel> = stored
            .iter()
            .map(|n| notification::ActiveModel {
                id: Set(n.id),
                recipient_id: Set(n.recipient_id),
                message: Set(n.message.clone()),
                created_at: Set(n.created_at),
                reviewed_by_user: Set(false),
            })
            .collect();

        with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                notification::Entity::insert_many(rows)
                    .exec(txn)
                    .await
                    .map_err(|e| AppError::from_write(e, "Notification"))?;
                Ok(())
            })
        })
        .await?;

        Ok(stored)
    }

    async fn list_for_recipient(&self, recipient_id: Uuid) -> AppResult<Vec<Notification>> {
        let models = notification::Entity::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Notification::from).collect())
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        let count = notification::Entity::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::ReviewedByUser.eq(false))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<Notification> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::ReviewedByUser, Expr::value(true))
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        let model = notification::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;
        Ok(Notification::from(model))
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::ReviewedByUser, Expr::value(true))
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .filter(notification::Column::ReviewedByUser.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
