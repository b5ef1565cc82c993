//! Create shipments table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_service_types::ServiceTypes;
use super::m20240101_000003_create_clients::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shipments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shipments::TrackingNumber).string().not_null())
                    .col(ColumnDef::new(Shipments::ClientId).integer().not_null())
                    .col(ColumnDef::new(Shipments::ServiceTypeId).integer().not_null())
                    .col(ColumnDef::new(Shipments::DestinationId).integer().not_null())
                    .col(
                        ColumnDef::new(Shipments::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Shipments::BaseAmount).string().not_null())
                    .col(ColumnDef::new(Shipments::WeightAmount).string().not_null())
                    .col(ColumnDef::new(Shipments::VolumeAmount).string().not_null())
                    .col(ColumnDef::new(Shipments::TotalAmount).string().not_null())
                    .col(ColumnDef::new(Shipments::BaseRate).string().not_null())
                    .col(ColumnDef::new(Shipments::WeightRate).string().not_null())
                    .col(ColumnDef::new(Shipments::VolumeRate).string().not_null())
                    .col(ColumnDef::new(Shipments::ServiceMultiplier).string().not_null())
                    .col(ColumnDef::new(Shipments::TotalWeight).string().not_null())
                    .col(ColumnDef::new(Shipments::TotalVolume).string().not_null())
                    .col(
                        ColumnDef::new(Shipments::MinChargeApplied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Shipments::IsInvoiced)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Shipments::InvoiceId).integer())
                    .col(
                        ColumnDef::new(Shipments::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Shipments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shipments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipments_client")
                            .from(Shipments::Table, Shipments::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipments_service_type")
                            .from(Shipments::Table, Shipments::ServiceTypeId)
                            .to(ServiceTypes::Table, ServiceTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipments_tracking_number")
                    .table(Shipments::Table)
                    .col(Shipments::TrackingNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipments_client")
                    .table(Shipments::Table)
                    .col(Shipments::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shipments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Shipments {
    Table,
    Id,
    TrackingNumber,
    ClientId,
    ServiceTypeId,
    DestinationId,
    Status,
    BaseAmount,
    WeightAmount,
    VolumeAmount,
    TotalAmount,
    BaseRate,
    WeightRate,
    VolumeRate,
    ServiceMultiplier,
    TotalWeight,
    TotalVolume,
    MinChargeApplied,
    IsInvoiced,
    InvoiceId,
    Version,
    CreatedAt,
    UpdatedAt,
}
