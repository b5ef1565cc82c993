//! Client DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::services::ClientBalanceSummary;
use crate::domain::client::{Client, NewClient};
use crate::domain::ledger::LedgerEntry;
use crate::interfaces::http::common::money;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Running credit counter moved by payments
    pub account_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
            account_balance: money(c.account_balance),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 200, message = "client name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

impl From<CreateClientRequest> for NewClient {
    fn from(req: CreateClientRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientBalanceResponse {
    pub client_id: i32,
    pub account_balance: Decimal,
    /// Sum of `amount_due` over pending, partially paid and overdue invoices
    pub total_pending: Decimal,
    pub pending_invoices_count: usize,
    pub currency: String,
}

impl ClientBalanceResponse {
    pub fn new(summary: ClientBalanceSummary, currency: &str) -> Self {
        Self {
            client_id: summary.client_id,
            account_balance: money(summary.account_balance),
            total_pending: money(summary.total_pending),
            pending_invoices_count: summary.pending_invoices_count,
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntryResponse {
    pub id: i32,
    pub client_id: i32,
    pub invoice_id: i32,
    pub payment_id: Option<i32>,
    /// `PAYMENT_RECORDED`, `PAYMENT_REVERSED` or `INVOICE_CANCELLED`
    pub kind: String,
    /// Signed movement
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntry> for LedgerEntryResponse {
    fn from(e: LedgerEntry) -> Self {
        Self {
            id: e.id,
            client_id: e.client_id,
            invoice_id: e.invoice_id,
            payment_id: e.payment_id,
            kind: e.kind.as_str().to_string(),
            amount: money(e.amount),
            balance_after: money(e.balance_after),
            created_at: e.created_at,
        }
    }
}
