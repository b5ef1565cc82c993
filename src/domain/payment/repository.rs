//! Payment repository interface

use async_trait::async_trait;

use super::model::{NewPayment, Payment};
use crate::domain::invoice::Invoice;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>>;
    async fn find_by_invoice(&self, invoice_id: i32) -> DomainResult<Vec<Payment>>;

    /// Insert the payment, persist `invoice` (already updated by
    /// `Invoice::apply_payment`) and credit the client, atomically.
    async fn record(&self, payment: NewPayment, invoice: &Invoice) -> DomainResult<(Payment, Invoice)>;

    /// Delete the payment, persist the reverted `invoice` and debit the
    /// client, atomically.
    async fn reverse(&self, payment: &Payment, invoice: &Invoice) -> DomainResult<Invoice>;
}
