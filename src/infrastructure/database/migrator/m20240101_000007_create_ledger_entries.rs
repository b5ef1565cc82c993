//! Create ledger_entries table

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_clients::Clients;
use super::m20240101_000005_create_invoices::Invoices;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::ClientId).integer().not_null())
                    .col(ColumnDef::new(LedgerEntries::InvoiceId).integer().not_null())
                    // No FK: the referenced payment is deleted on reversal
                    .col(ColumnDef::new(LedgerEntries::PaymentId).integer())
                    .col(ColumnDef::new(LedgerEntries::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(LedgerEntries::Amount).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::BalanceAfter).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entries_client")
                            .from(LedgerEntries::Table, LedgerEntries::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entries_invoice")
                            .from(LedgerEntries::Table, LedgerEntries::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entries_client")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum LedgerEntries {
    Table,
    Id,
    ClientId,
    InvoiceId,
    PaymentId,
    Kind,
    Amount,
    BalanceAfter,
    CreatedAt,
}
