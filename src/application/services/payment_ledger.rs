//! Payment ledger: payments, reversals and client balances

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::client::Client;
use crate::domain::invoice::Invoice;
use crate::domain::ledger::LedgerEntry;
use crate::domain::payment::{NewPayment, Payment, PaymentMethod};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::money::round2;
use crate::shared::retry::{retry_with_backoff, RetryConfig};

#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub invoice_id: i32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    /// Defaults to now
    pub payment_date: Option<DateTime<Utc>>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Stored payment with the invoice state it produced
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub invoice: Invoice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientBalanceSummary {
    pub client_id: i32,
    pub account_balance: Decimal,
    /// Sum of `amount_due` over PENDING, PARTIALLY_PAID and OVERDUE invoices
    pub total_pending: Decimal,
    pub pending_invoices_count: usize,
}

pub struct PaymentLedgerService {
    repos: Arc<dyn RepositoryProvider>,
    retry: RetryConfig,
}

impl PaymentLedgerService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, retry: RetryConfig) -> Self {
        Self { repos, retry }
    }

    /// Apply a payment to an invoice and credit the client, atomically.
    /// The overpayment check runs against the invoice version being
    /// written, so two concurrent payments cannot both pass it.
    pub async fn record_payment(&self, req: RecordPayment) -> DomainResult<PaymentReceipt> {
        let result = retry_with_backoff(
            self.retry.clone(),
            || self.try_record(&req),
            DomainError::is_transient,
            "record_payment",
        )
        .await;

        match &result {
            Ok(_) => metrics::counter!("billing_payments_recorded_total").increment(1),
            Err(e) => warn!(
                invoice_id = req.invoice_id,
                amount = %req.amount,
                code = e.code(),
                "Payment rejected"
            ),
        }
        result
    }

    async fn try_record(&self, req: &RecordPayment) -> DomainResult<PaymentReceipt> {
        let mut invoice = self.load_invoice(req.invoice_id).await?;
        invoice.apply_payment(req.amount)?;

        let new_payment = NewPayment {
            invoice_id: invoice.id,
            client_id: invoice.client_id,
            amount: req.amount,
            method: req.method,
            payment_date: req.payment_date.unwrap_or_else(Utc::now),
            reference: req.reference.clone(),
            notes: req.notes.clone(),
        };
        let (payment, invoice) = self.repos.payments().record(new_payment, &invoice).await?;
        Ok(PaymentReceipt { payment, invoice })
    }

    /// Undo a payment: the invoice and client balance are restored and the
    /// reversal is journaled before the payment row is removed.
    pub async fn cancel_payment(&self, payment_id: i32) -> DomainResult<Invoice> {
        let result = retry_with_backoff(
            self.retry.clone(),
            || self.try_cancel(payment_id),
            DomainError::is_transient,
            "cancel_payment",
        )
        .await;

        match &result {
            Ok(_) => metrics::counter!("billing_payments_cancelled_total").increment(1),
            Err(e) => warn!(payment_id, code = e.code(), "Payment cancellation rejected"),
        }
        result
    }

    async fn try_cancel(&self, payment_id: i32) -> DomainResult<Invoice> {
        let payment = self
            .repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;
        let mut invoice = self.load_invoice(payment.invoice_id).await?;
        invoice.reverse_payment(payment.amount)?;
        self.repos.payments().reverse(&payment, &invoice).await
    }

    pub async fn list_payments(&self, invoice_id: i32) -> DomainResult<Vec<Payment>> {
        self.load_invoice(invoice_id).await?;
        self.repos.payments().find_by_invoice(invoice_id).await
    }

    pub async fn client_balance_summary(&self, client_id: i32) -> DomainResult<ClientBalanceSummary> {
        let client = self.load_client(client_id).await?;
        let outstanding: Vec<Invoice> = self
            .repos
            .invoices()
            .find_by_client(client_id)
            .await?
            .into_iter()
            .filter(|i| i.status.is_outstanding())
            .collect();

        let total_pending = round2(outstanding.iter().map(|i| i.amount_due).sum());
        Ok(ClientBalanceSummary {
            client_id,
            account_balance: client.account_balance,
            total_pending,
            pending_invoices_count: outstanding.len(),
        })
    }

    pub async fn client_ledger(&self, client_id: i32) -> DomainResult<Vec<LedgerEntry>> {
        self.load_client(client_id).await?;
        self.repos.ledger().find_by_client(client_id).await
    }

    async fn load_invoice(&self, id: i32) -> DomainResult<Invoice> {
        self.repos
            .invoices()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Invoice", id))
    }

    async fn load_client(&self, id: i32) -> DomainResult<Client> {
        self.repos
            .clients()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", id))
    }
}
