//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_service_types;
mod m20240101_000002_create_rate_rules;
mod m20240101_000003_create_clients;
mod m20240101_000004_create_shipments;
mod m20240101_000005_create_invoices;
mod m20240101_000006_create_payments;
mod m20240101_000007_create_ledger_entries;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_service_types::Migration),
            Box::new(m20240101_000002_create_rate_rules::Migration),
            Box::new(m20240101_000003_create_clients::Migration),
            Box::new(m20240101_000004_create_shipments::Migration),
            Box::new(m20240101_000005_create_invoices::Migration),
            Box::new(m20240101_000006_create_payments::Migration),
            Box::new(m20240101_000007_create_ledger_entries::Migration),
        ]
    }
}
