use sea_orm::entity::prelude::*;

use crate::domain::CompanySubscription;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "company_subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub alumnus_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: Uuid,
    pub subscribed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CompanySubscription {
    fn from(model: Model) -> Self {
        Self {
            alumnus_id: model.alumnus_id,
            company_id: model.company_id,
            subscribed_at: model.subscribed_at,
        }
    }
}
