//! Invoice repository interface
//!
//! Multi-row operations are single units of work: either every row they
//! touch is written, or none is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::{Invoice, InvoiceStatus, NewInvoice};
use crate::domain::DomainResult;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Invoice>>;
    async fn find_by_client(&self, client_id: i32) -> DomainResult<Vec<Invoice>>;
    async fn find_all(&self, status: Option<InvoiceStatus>) -> DomainResult<Vec<Invoice>>;
    /// PENDING or PARTIALLY_PAID invoices with `due_date < now`
    async fn find_overdue_candidates(&self, now: DateTime<Utc>) -> DomainResult<Vec<Invoice>>;

    /// Claim the listed shipments and insert the invoice with its lines.
    /// `Conflict` if any shipment was invoiced concurrently.
    async fn create(&self, invoice: NewInvoice) -> DomainResult<Invoice>;

    /// Persist a cancelled invoice, release its shipments and debit
    /// `refund` from the client balance. `invoice.version` is the version
    /// the caller loaded.
    async fn cancel(&self, invoice: &Invoice, refund: Decimal) -> DomainResult<Invoice>;

    /// Compare-and-swap status update
    async fn update_status(&self, invoice: &Invoice) -> DomainResult<Invoice>;
}
