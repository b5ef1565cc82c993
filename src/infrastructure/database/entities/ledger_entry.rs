//! Client balance journal entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum LedgerEntryKind {
    #[sea_orm(string_value = "PAYMENT_RECORDED")]
    PaymentRecorded,
    #[sea_orm(string_value = "PAYMENT_REVERSED")]
    PaymentReversed,
    #[sea_orm(string_value = "INVOICE_CANCELLED")]
    InvoiceCancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub client_id: i32,

    pub invoice_id: i32,

    /// Plain reference; reversed payments no longer exist
    #[sea_orm(nullable)]
    pub payment_id: Option<i32>,

    pub kind: LedgerEntryKind,

    /// Signed balance movement
    pub amount: String,

    pub balance_after: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
