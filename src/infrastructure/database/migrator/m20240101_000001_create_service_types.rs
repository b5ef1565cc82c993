//! Create service_types table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceTypes::Name).string().not_null())
                    .col(ColumnDef::new(ServiceTypes::Description).string())
                    .col(
                        ColumnDef::new(ServiceTypes::Multiplier)
                            .string()
                            .not_null()
                            .default("1"),
                    )
                    .col(
                        ColumnDef::new(ServiceTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ServiceTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_types_name")
                    .table(ServiceTypes::Table)
                    .col(ServiceTypes::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceTypes {
    Table,
    Id,
    Name,
    Description,
    Multiplier,
    IsActive,
    CreatedAt,
}
