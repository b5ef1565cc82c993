//! Rate rule entity
//!
//! Monetary columns hold decimals as canonical text so that SQLite keeps
//! them exact.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rate_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub service_type_id: i32,

    pub destination_id: i32,

    pub base_rate: String,

    /// Per kilogram
    pub weight_rate: String,

    /// Per cubic metre
    pub volume_rate: String,

    pub min_charge: String,

    pub effective_from: DateTimeUtc,

    /// None = open-ended
    #[sea_orm(nullable)]
    pub effective_to: Option<DateTimeUtc>,

    pub is_active: bool,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_type::Entity",
        from = "Column::ServiceTypeId",
        to = "super::service_type::Column::Id"
    )]
    ServiceType,
}

impl Related<super::service_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
