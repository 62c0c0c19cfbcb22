//! Company profile row, one per company account.

use sea_orm::entity::prelude::*;

use crate::domain::CompanyProfile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "company_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: Uuid,
    #[sea_orm(unique)]
    pub company_name: String,
    pub mailing_address: String,
    #[sea_orm(unique)]
    pub website_url: Option<String>,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub public_email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(has_many = "super::job_listing::Entity")]
    JobListing,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::job_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobListing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CompanyProfile {
    fn from(model: Model) -> Self {
        Self {
            company_name: model.company_name,
            mailing_address: model.mailing_address,
            website_url: model.website_url,
            phone_number: model.phone_number,
            public_email: model.public_email,
        }
    }
}
