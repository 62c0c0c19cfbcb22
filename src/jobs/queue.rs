//! Producer side of the email queue.

use async_trait::async_trait;
use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;

use super::email_job::EmailJob;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Something that accepts email jobs for later delivery.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmailQueue: Send + Sync {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()>;
}

/// Email queue backed by apalis' PostgreSQL storage.
#[derive(Clone)]
pub struct ApalisEmailQueue {
    storage: PostgresStorage<EmailJob>,
}

impl ApalisEmailQueue {
    /// Open a pool on the application database and make sure the job tables exist.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .map_err(|e| AppError::internal(format!("Failed to connect to job storage: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

        Ok(Self {
            storage: PostgresStorage::new(pool),
        })
    }

    pub fn storage(&self) -> PostgresStorage<EmailJob> {
        self.storage.clone()
    }
}

#[async_trait]
impl EmailQueue for ApalisEmailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        let mut storage = self.storage.clone();
        let to = job.to.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))?;

        tracing::debug!(to = %to, "Email job enqueued");
        Ok(())
    }
}
