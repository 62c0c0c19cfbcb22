//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub login_email: String,
    pub password_hash: String,
    pub profile_photo_file_path: Option<String>,
    /// `admin`, `alumnus` or `company`
    pub kind: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::alumnus_profile::Entity")]
    AlumnusProfile,
    #[sea_orm(has_one = "super::company_profile::Entity")]
    CompanyProfile,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::alumnus_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlumnusProfile.def()
    }
}

impl Related<super::company_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyProfile.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
