//! Job listing repository, including the public search query.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{company_profile, job_listing};
use crate::domain::{ApprovalStatus, JobListing, ListingSearch, ListingWithCompany, NewJobListing};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::Connection;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Job listing repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobListingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobListing>>;

    /// Insert a new listing in `PENDING` state
    async fn create(&self, listing: NewJobListing) -> AppResult<JobListing>;

    /// Overwrite the approval status
    async fn set_status(&self, id: Uuid, status: ApprovalStatus) -> AppResult<JobListing>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Every listing regardless of status, newest first
    async fn list_all(&self) -> AppResult<Vec<JobListing>>;

    /// A company's listings, optionally restricted to one status
    async fn list_by_company(
        &self,
        company_id: Uuid,
        status: Option<ApprovalStatus>,
    ) -> AppResult<Vec<JobListing>>;

    /// Approved listings matching the filters, with the total match count
    async fn search(
        &self,
        filters: ListingSearch,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingWithCompany>, u64)>;
}

/// Concrete implementation of JobListingRepository
pub struct JobListingStore {
    db: Connection,
}

impl JobListingStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn search_condition(filters: &ListingSearch) -> Condition {
    let mut condition = Condition::all().add(
        job_listing::Column::AdminApprovalStatus.eq(ApprovalStatus::Approved.as_str()),
    );

    if let Some(term) = filters.term() {
        let pattern = like_pattern(term);
        condition = condition.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        job_listing::Entity,
                        job_listing::Column::Title,
                    ))))
                    .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        company_profile::Entity,
                        company_profile::Column::CompanyName,
                    ))))
                    .like(pattern),
                ),
        );
    }

    if let Some(position) = filters.position_type {
        condition = condition.add(job_listing::Column::PositionType.eq(position.as_str()));
    }

    if let Some(location) = filters
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        condition = condition.add(job_listing::Column::JobSite.eq(location));
    }

    if let Some(min) = filters.min_salary {
        condition = condition.add(job_listing::Column::MonthlySalaryTtd.gte(min));
    }

    if let Some(max) = filters.max_salary {
        condition = condition.add(job_listing::Column::MonthlySalaryTtd.lte(max));
    }

    condition
}

fn to_domain(models: Vec<job_listing::Model>) -> AppResult<Vec<JobListing>> {
    models.into_iter().map(JobListing::try_from).collect()
}

#[async_trait]
impl JobListingRepository for JobListingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobListing>> {
        job_listing::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(JobListing::try_from)
            .transpose()
    }

    async fn create(&self, listing: NewJobListing) -> AppResult<JobListing> {
        let now = Utc::now();
        let model = job_listing::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(listing.company_id),
            title: Set(listing.title),
            position_type: Set(listing.position_type.as_str().to_string()),
            description: Set(listing.description),
            monthly_salary_ttd: Set(listing.monthly_salary_ttd),
            is_remote: Set(listing.is_remote),
            job_site: Set(listing.job_site),
            admin_approval_status: Set(ApprovalStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Job listing"))?;

        JobListing::try_from(model)
    }

    async fn set_status(&self, id: Uuid, status: ApprovalStatus) -> AppResult<JobListing> {
        let model = job_listing::ActiveModel {
            id: Unchanged(id),
            admin_approval_status: Set(status.as_str().to_string()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| AppError::from_write(e, "Job listing"))?;

        JobListing::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = job_listing::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<JobListing>> {
        let models = job_listing::Entity::find()
            .order_by_desc(job_listing::Column::CreatedAt)
            .all(&self.db)
            .await?;
        to_domain(models)
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
        status: Option<ApprovalStatus>,
    ) -> AppResult<Vec<JobListing>> {
        let mut query = job_listing::Entity::find()
            .filter(job_listing::Column::CompanyId.eq(company_id))
            .order_by_desc(job_listing::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(job_listing::Column::AdminApprovalStatus.eq(status.as_str()));
        }

        to_domain(query.all(&self.db).await?)
    }

    async fn search(
        &self,
        filters: ListingSearch,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingWithCompany>, u64)> {
        let paginator = job_listing::Entity::find()
            .find_also_related(company_profile::Entity)
            .filter(search_condition(&filters))
            .order_by_desc(job_listing::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.page() - 1).await?;

        let listings = rows
            .into_iter()
            .map(|(listing, company)| {
                Ok(ListingWithCompany {
                    listing: JobListing::try_from(listing)?,
                    company_name: company.map(|c| c.company_name).unwrap_or_default(),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(total, returned = listings.len(), "Listing search executed");
        Ok((listings, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Dev"), "%dev%");
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
    }

    #[test]
    fn test_search_sql_only_targets_approved_listings() {
        let filters = ListingSearch {
            q: Some("Rust".to_string()),
            min_salary: Some(5000),
            ..Default::default()
        };
        let sql = job_listing::Entity::find()
            .find_also_related(company_profile::Entity)
            .filter(search_condition(&filters))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("'APPROVED'"));
        assert!(sql.contains("LOWER(\"company_profiles\".\"company_name\")"));
        assert!(sql.contains("\"monthly_salary_ttd\" >= 5000"));
        assert!(!sql.contains("<="));
    }
}
