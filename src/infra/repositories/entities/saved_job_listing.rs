use sea_orm::entity::prelude::*;

use crate::domain::SavedJobListing;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "saved_job_listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub alumnus_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub job_listing_id: Uuid,
    pub saved_at: DateTimeUtc,
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
}

impl Related<super::job_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobListing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SavedJobListing {
    fn from(model: Model) -> Self {
        Self {
            alumnus_id: model.alumnus_id,
            job_listing_id: model.job_listing_id,
            saved_at: model.saved_at,
        }
    }
}
