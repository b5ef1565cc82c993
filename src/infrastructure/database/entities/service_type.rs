//! Service type entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(nullable)]
    pub description: Option<String>,

    /// Decimal as canonical text
    pub multiplier: String,

    pub is_active: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rate_rule::Entity")]
    RateRules,
}

impl Related<super::rate_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
