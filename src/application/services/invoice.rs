//! Invoice generation and lifecycle
//!
//! Each write is a read-modify-write guarded by the invoice version. A lost
//! race is retried against fresh state, then surfaced as `Conflict`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::client::Client;
use crate::domain::invoice::{Invoice, InvoiceStatus, NewInvoice};
use crate::domain::payment::Payment;
use crate::domain::shipment::Shipment;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

#[derive(Debug, Clone)]
pub struct GenerateInvoice {
    pub client_id: i32,
    pub shipment_ids: Vec<i32>,
    /// Falls back to the configured default
    pub due_in_days: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub client_id: Option<i32>,
    pub status: Option<InvoiceStatus>,
}

/// Invoice with its references resolved
#[derive(Debug, Clone)]
pub struct InvoiceDetails {
    pub invoice: Invoice,
    pub client: Client,
    pub shipments: Vec<Shipment>,
    pub payments: Vec<Payment>,
}

pub struct InvoiceService {
    repos: Arc<dyn RepositoryProvider>,
    retry: RetryConfig,
    default_due_days: i64,
}

impl InvoiceService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, retry: RetryConfig, default_due_days: i64) -> Self {
        Self {
            repos,
            retry,
            default_due_days,
        }
    }

    /// Bill a set of delivered or returned shipments in one invoice.
    /// All-or-nothing: either every shipment is claimed by the new invoice
    /// or nothing is written.
    pub async fn generate_invoice(&self, req: GenerateInvoice) -> DomainResult<Invoice> {
        if req.shipment_ids.is_empty() {
            return Err(DomainError::Validation(
                "at least one shipment is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = req.shipment_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(DomainError::Validation(format!(
                "shipment {} is listed more than once",
                dup
            )));
        }
        let due_in_days = req.due_in_days.unwrap_or(self.default_due_days);
        if due_in_days < 0 {
            return Err(DomainError::Validation(
                "due_in_days must not be negative".to_string(),
            ));
        }

        self.repos
            .clients()
            .find_by_id(req.client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", req.client_id))?;

        let result = retry_with_backoff(
            self.retry.clone(),
            || self.try_generate(&req, due_in_days),
            DomainError::is_transient,
            "generate_invoice",
        )
        .await;

        match &result {
            Ok(invoice) => {
                metrics::counter!("billing_invoices_generated_total").increment(1);
                info!(
                    invoice_id = invoice.id,
                    client_id = invoice.client_id,
                    amount_ht = %invoice.amount_ht,
                    total_ttc = %invoice.total_ttc,
                    "Invoice generated"
                );
            }
            Err(e) => warn!(client_id = req.client_id, error = %e, "Invoice generation rejected"),
        }
        result
    }

    async fn try_generate(&self, req: &GenerateInvoice, due_in_days: i64) -> DomainResult<Invoice> {
        let found = self.repos.shipments().find_by_ids(&req.shipment_ids).await?;

        let mut lines = Vec::with_capacity(req.shipment_ids.len());
        let mut ineligible = Vec::new();
        for id in &req.shipment_ids {
            match found.iter().find(|s| s.id == *id) {
                Some(s) if s.is_eligible_for_invoice(req.client_id) => {
                    lines.push((s.id, s.total_amount()))
                }
                _ => ineligible.push(*id),
            }
        }
        if !ineligible.is_empty() {
            return Err(DomainError::IneligibleShipments { ids: ineligible });
        }

        let draft = NewInvoice::draft(
            req.client_id,
            &lines,
            Utc::now(),
            due_in_days,
            req.notes.clone(),
        )?;
        self.repos.invoices().create(draft).await
    }

    /// Cancel an unpaid or partially paid invoice. Prior payments are
    /// debited back from the client balance and the shipments become
    /// billable again.
    pub async fn cancel_invoice(&self, id: i32) -> DomainResult<Invoice> {
        let result = retry_with_backoff(
            self.retry.clone(),
            || self.try_cancel(id),
            DomainError::is_transient,
            "cancel_invoice",
        )
        .await;

        match &result {
            Ok(_) => metrics::counter!("billing_invoices_cancelled_total").increment(1),
            Err(e) => warn!(invoice_id = id, error = %e, "Invoice cancellation rejected"),
        }
        result
    }

    async fn try_cancel(&self, id: i32) -> DomainResult<Invoice> {
        let mut invoice = self.get_invoice(id).await?;
        let refund = invoice.cancel()?;
        self.repos.invoices().cancel(&invoice, refund).await
    }

    pub async fn get_invoice(&self, id: i32) -> DomainResult<Invoice> {
        self.repos
            .invoices()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Invoice", id))
    }

    pub async fn get_invoice_details(&self, id: i32) -> DomainResult<InvoiceDetails> {
        let invoice = self.get_invoice(id).await?;
        let client = self
            .repos
            .clients()
            .find_by_id(invoice.client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", invoice.client_id))?;

        // Lines keep the shipments of cancelled invoices too
        let mut shipments = self.repos.shipments().find_by_ids(&invoice.shipment_ids()).await?;
        shipments.sort_by_key(|s| {
            invoice
                .lines
                .iter()
                .position(|l| l.shipment_id == s.id)
                .unwrap_or(usize::MAX)
        });
        let payments = self.repos.payments().find_by_invoice(id).await?;

        Ok(InvoiceDetails {
            invoice,
            client,
            shipments,
            payments,
        })
    }

    pub async fn list_invoices(&self, filter: InvoiceFilter) -> DomainResult<Vec<Invoice>> {
        match filter.client_id {
            Some(client_id) => {
                let invoices = self.repos.invoices().find_by_client(client_id).await?;
                Ok(invoices
                    .into_iter()
                    .filter(|i| filter.status.map_or(true, |s| i.status == s))
                    .collect())
            }
            None => self.repos.invoices().find_all(filter.status).await,
        }
    }

    /// Flag the invoice OVERDUE if its due date is before `now`. Calling it
    /// again changes nothing.
    pub async fn check_overdue(&self, id: i32, now: DateTime<Utc>) -> DomainResult<Invoice> {
        retry_with_backoff(
            self.retry.clone(),
            || self.try_check_overdue(id, now),
            DomainError::is_transient,
            "check_overdue",
        )
        .await
    }

    async fn try_check_overdue(&self, id: i32, now: DateTime<Utc>) -> DomainResult<Invoice> {
        let mut invoice = self.get_invoice(id).await?;
        if !invoice.check_overdue(now) {
            return Ok(invoice);
        }
        let updated = self.repos.invoices().update_status(&invoice).await?;
        metrics::counter!("billing_invoices_overdue_total").increment(1);
        info!(invoice_id = id, due_date = %updated.due_date, "Invoice marked overdue");
        Ok(updated)
    }

    /// Evaluate every open invoice against `now`. Returns the invoices that
    /// became overdue.
    pub async fn sweep_overdue(&self, now: DateTime<Utc>) -> DomainResult<Vec<Invoice>> {
        let candidates = self.repos.invoices().find_overdue_candidates(now).await?;
        let mut flagged = Vec::new();
        for candidate in candidates {
            match self.check_overdue(candidate.id, now).await {
                Ok(inv) if inv.status == InvoiceStatus::Overdue => flagged.push(inv),
                Ok(_) => {}
                // A payment may have landed meanwhile; the next sweep sees it
                Err(e) if e.is_transient() => {
                    warn!(invoice_id = candidate.id, error = %e, "Overdue check skipped")
                }
                Err(e) => return Err(e),
            }
        }
        info!(count = flagged.len(), "Overdue sweep finished");
        Ok(flagged)
    }
}
