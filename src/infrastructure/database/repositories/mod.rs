//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod client_repository;
pub mod invoice_repository;
pub mod ledger_repository;
pub mod payment_repository;
pub mod rate_repository;
pub mod repository_provider;
pub mod shipment_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::from(e)
}

/// A compare-and-swap write matched no row: someone else got there first.
fn conflict(entity: &'static str, id: i32) -> DomainError {
    metrics::counter!("billing_conflicts_total", "entity" => entity).increment(1);
    DomainError::Conflict(format!("{} {} was modified concurrently", entity, id))
}
