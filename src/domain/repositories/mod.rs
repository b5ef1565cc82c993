//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` : unified access to all per-aggregate repositories
//! - `DomainResult` : standard result type for domain operations

use super::client::ClientRepository;
use super::invoice::InvoiceRepository;
use super::ledger::LedgerRepository;
use super::payment::PaymentRepository;
use super::rate::{RateRuleRepository, ServiceTypeRepository};
use super::shipment::ShipmentRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let invoice = repos.invoices().find_by_id(42).await?;
///     let payments = repos.payments().find_by_invoice(42).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn service_types(&self) -> &dyn ServiceTypeRepository;
    fn rates(&self) -> &dyn RateRuleRepository;
    fn clients(&self) -> &dyn ClientRepository;
    fn shipments(&self) -> &dyn ShipmentRepository;
    fn invoices(&self) -> &dyn InvoiceRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn ledger(&self) -> &dyn LedgerRepository;
}
