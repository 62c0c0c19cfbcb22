//! Job listing database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::JobListing;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub position_type: String,
    pub description: String,
    pub monthly_salary_ttd: i32,
    pub is_remote: bool,
    pub job_site: String,
    pub admin_approval_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company_profile::Entity",
        from = "Column::CompanyId",
        to = "super::company_profile::Column::AccountId",
        on_delete = "Cascade"
    )]
    CompanyProfile,
    #[sea_orm(has_many = "super::job_application::Entity")]
    JobApplication,
    #[sea_orm(has_many = "super::saved_job_listing::Entity")]
    SavedJobListing,
}

impl Related<super::company_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyProfile.def()
    }
}

impl Related<super::job_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplication.def()
    }
}

impl Related<super::saved_job_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavedJobListing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Stored enum strings are guarded by check constraints; a mismatch is a bug.
impl TryFrom<Model> for JobListing {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            company_id: model.company_id,
            title: model.title,
            position_type: model.position_type.parse().map_err(|_| {
                AppError::internal(format!("Corrupt position type on listing {}", model.id))
            })?,
            description: model.description,
            monthly_salary_ttd: model.monthly_salary_ttd,
            is_remote: model.is_remote,
            job_site: model.job_site,
            admin_approval_status: model.admin_approval_status.parse().map_err(|_| {
                AppError::internal(format!("Corrupt approval status on listing {}", model.id))
            })?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
