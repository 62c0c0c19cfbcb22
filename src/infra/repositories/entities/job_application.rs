//! Job application database entity (composite key).

use sea_orm::entity::prelude::*;

use crate::domain::JobApplication;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub alumnus_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_listing_id: Uuid,
    pub resume_file_path: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub work_experience: Option<String>,
    pub applied_at: DateTimeUtc,
    pub company_approval_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_listing::Entity",
        from = "Column::JobListingId",
        to = "super::job_listing::Column::Id",
        on_delete = "Cascade"
    )]
    JobListing,
    #[sea_orm(
        belongs_to = "super::alumnus_profile::Entity",
        from = "Column::AlumnusId",
        to = "super::alumnus_profile::Column::AccountId",
        on_delete = "Cascade"
    )]
    AlumnusProfile,
}

impl Related<super::job_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobListing.def()
    }
}

impl Related<super::alumnus_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlumnusProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for JobApplication {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let company_approval_status = model.company_approval_status.parse().map_err(|_| {
            AppError::internal(format!(
                "Corrupt approval status on application ({}, {})",
                model.alumnus_id, model.job_listing_id
            ))
        })?;

        Ok(Self {
            alumnus_id: model.alumnus_id,
            job_listing_id: model.job_listing_id,
            resume_file_path: model.resume_file_path,
            work_experience: model.work_experience,
            applied_at: model.applied_at,
            company_approval_status,
        })
    }
}
