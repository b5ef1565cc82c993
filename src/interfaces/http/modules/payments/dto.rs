//! Payment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::payment::Payment;
use crate::interfaces::http::common::money;
use crate::interfaces::http::modules::invoices::InvoiceResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub invoice_id: i32,
    pub client_id: i32,
    pub amount: Decimal,
    /// `CASH`, `CHECK`, `BANK_TRANSFER`, `CARD` or `OTHER`
    pub method: String,
    pub payment_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            invoice_id: p.invoice_id,
            client_id: p.client_id,
            amount: money(p.amount),
            method: p.method.to_string(),
            payment_date: p.payment_date,
            reference: p.reference,
            notes: p.notes,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    /// Positive, at most two decimal places
    pub amount: Decimal,
    /// Defaults to `CASH`
    pub method: Option<String>,
    /// Defaults to now
    pub payment_date: Option<DateTime<Utc>>,
    #[validate(length(max = 128))]
    pub reference: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Stored payment together with the invoice it settled
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentReceiptResponse {
    pub payment: PaymentResponse,
    pub invoice: InvoiceResponse,
}
