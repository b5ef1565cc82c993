//! Create rate_rules table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_service_types::ServiceTypes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RateRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RateRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RateRules::ServiceTypeId).integer().not_null())
                    .col(ColumnDef::new(RateRules::DestinationId).integer().not_null())
                    .col(ColumnDef::new(RateRules::BaseRate).string().not_null())
                    .col(ColumnDef::new(RateRules::WeightRate).string().not_null())
                    .col(ColumnDef::new(RateRules::VolumeRate).string().not_null())
                    .col(ColumnDef::new(RateRules::MinCharge).string().not_null())
                    .col(
                        ColumnDef::new(RateRules::EffectiveFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RateRules::EffectiveTo).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(RateRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RateRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RateRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rate_rules_service_type")
                            .from(RateRules::Table, RateRules::ServiceTypeId)
                            .to(ServiceTypes::Table, ServiceTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Route lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_rate_rules_route")
                    .table(RateRules::Table)
                    .col(RateRules::ServiceTypeId)
                    .col(RateRules::DestinationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RateRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RateRules {
    Table,
    Id,
    ServiceTypeId,
    DestinationId,
    BaseRate,
    WeightRate,
    VolumeRate,
    MinCharge,
    EffectiveFrom,
    EffectiveTo,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
