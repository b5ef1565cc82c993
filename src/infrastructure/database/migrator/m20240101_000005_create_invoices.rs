//! Create invoices and invoice_lines tables

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_clients::Clients;
use super::m20240101_000004_create_shipments::Shipments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::InvoiceNumber).string().not_null())
                    .col(ColumnDef::new(Invoices::ClientId).integer().not_null())
                    .col(ColumnDef::new(Invoices::AmountHt).string().not_null())
                    .col(ColumnDef::new(Invoices::TvaRate).string().not_null())
                    .col(ColumnDef::new(Invoices::TvaAmount).string().not_null())
                    .col(ColumnDef::new(Invoices::TotalTtc).string().not_null())
                    .col(
                        ColumnDef::new(Invoices::AmountPaid)
                            .string()
                            .not_null()
                            .default("0"),
                    )
                    .col(ColumnDef::new(Invoices::AmountDue).string().not_null())
                    .col(
                        ColumnDef::new(Invoices::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Invoices::IssueDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::DueDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::Notes).string())
                    .col(
                        ColumnDef::new(Invoices::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_client")
                            .from(Invoices::Table, Invoices::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_number")
                    .table(Invoices::Table)
                    .col(Invoices::InvoiceNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_client_status")
                    .table(Invoices::Table)
                    .col(Invoices::ClientId)
                    .col(Invoices::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceLines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvoiceLines::InvoiceId).integer().not_null())
                    .col(ColumnDef::new(InvoiceLines::ShipmentId).integer().not_null())
                    .col(ColumnDef::new(InvoiceLines::Position).integer().not_null())
                    .col(ColumnDef::new(InvoiceLines::AmountHt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_lines_invoice")
                            .from(InvoiceLines::Table, InvoiceLines::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_lines_shipment")
                            .from(InvoiceLines::Table, InvoiceLines::ShipmentId)
                            .to(Shipments::Table, Shipments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // A shipment may appear on a cancelled invoice and again on its
        // replacement, so shipment_id is indexed but not unique.
        manager
            .create_index(
                Index::create()
                    .name("idx_invoice_lines_shipment")
                    .table(InvoiceLines::Table)
                    .col(InvoiceLines::ShipmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvoiceLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Invoices {
    Table,
    Id,
    InvoiceNumber,
    ClientId,
    AmountHt,
    TvaRate,
    TvaAmount,
    TotalTtc,
    AmountPaid,
    AmountDue,
    Status,
    IssueDate,
    DueDate,
    Notes,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum InvoiceLines {
    Table,
    Id,
    InvoiceId,
    ShipmentId,
    Position,
    AmountHt,
}
