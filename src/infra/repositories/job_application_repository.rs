//! Job application repository (composite key: alumnus, listing).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::job_application;
use crate::domain::{ApplicationStatus, JobApplication};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::Connection;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    async fn find(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<Option<JobApplication>>;

    /// Insert; a second application for the same pair is a `Conflict`
    async fn create(&self, application: JobApplication) -> AppResult<JobApplication>;

    async fn update_resume(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        resume_file_path: String,
    ) -> AppResult<JobApplication>;

    async fn set_status(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        status: ApplicationStatus,
    ) -> AppResult<JobApplication>;

    async fn delete(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<()>;

    async fn list_all(&self) -> AppResult<Vec<JobApplication>>;

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<JobApplication>>;

    async fn list_by_listing(&self, listing_id: Uuid) -> AppResult<Vec<JobApplication>>;
}

pub struct JobApplicationStore {
    db: Connection,
}

impl JobApplicationStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        filter: Option<sea_orm::sea_query::SimpleExpr>,
    ) -> AppResult<Vec<JobApplication>> {
        let mut query =
            job_application::Entity::find().order_by_desc(job_application::Column::AppliedAt);
        if let Some(filter) = filter {
            query = query.filter(filter);
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(JobApplication::try_from)
            .collect()
    }
}

#[async_trait]
impl JobApplicationRepository for JobApplicationStore {
    async fn find(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<Option<JobApplication>> {
        job_application::Entity::find_by_id((alumnus_id, listing_id))
            .one(&self.db)
            .await?
            .map(JobApplication::try_from)
            .transpose()
    }

    async fn create(&self, application: JobApplication) -> AppResult<JobApplication> {
        let model = job_application::ActiveModel {
            alumnus_id: Set(application.alumnus_id),
            job_listing_id: Set(application.job_listing_id),
            resume_file_path: Set(application.resume_file_path),
            work_experience: Set(application.work_experience),
            applied_at: Set(application.applied_at),
            company_approval_status: Set(application.company_approval_status.as_str().to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Application"))?;

        JobApplication::try_from(model)
    }

    async fn update_resume(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        resume_file_path: String,
    ) -> AppResult<JobApplication> {
        let model = job_application::ActiveModel {
            alumnus_id: Unchanged(alumnus_id),
            job_listing_id: Unchanged(listing_id),
            resume_file_path: Set(resume_file_path),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Application"))?;

        JobApplication::try_from(model)
    }

    async fn set_status(
        &self,
        alumnus_id: Uuid,
        listing_id: Uuid,
        status: ApplicationStatus,
    ) -> AppResult<JobApplication> {
        let model = job_application::ActiveModel {
            alumnus_id: Unchanged(alumnus_id),
            job_listing_id: Unchanged(listing_id),
            company_approval_status: Set(status.as_str().to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Application"))?;

        JobApplication::try_from(model)
    }

    async fn delete(&self, alumnus_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        let result = job_application::Entity::delete_by_id((alumnus_id, listing_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<JobApplication>> {
        self.list_where(None).await
    }

    async fn list_by_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<JobApplication>> {
        self.list_where(Some(job_application::Column::AlumnusId.eq(alumnus_id)))
            .await
    }

    async fn list_by_listing(&self, listing_id: Uuid) -> AppResult<Vec<JobApplication>> {
        self.list_where(Some(job_application::Column::JobListingId.eq(listing_id)))
            .await
    }
}
