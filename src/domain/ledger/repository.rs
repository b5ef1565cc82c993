use async_trait::async_trait;

use super::model::LedgerEntry;
use crate::domain::DomainResult;

/// Read side of the balance journal. Entries are written by the invoice
/// and payment repositories.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn find_by_client(&self, client_id: i32) -> DomainResult<Vec<LedgerEntry>>;
    async fn find_by_invoice(&self, invoice_id: i32) -> DomainResult<Vec<LedgerEntry>>;
}
