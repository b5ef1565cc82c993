//! Invoice DTOs
//!
//! Invoices have two shapes: a reference shape that carries ids only and an
//! expanded shape with the client, shipments and payments inlined.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{GenerateInvoice, InvoiceDetails};
use crate::domain::invoice::{Invoice, InvoiceLine};
use crate::interfaces::http::common::money;
use crate::interfaces::http::modules::clients::ClientResponse;
use crate::interfaces::http::modules::payments::PaymentResponse;
use crate::interfaces::http::modules::shipments::ShipmentResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceLineResponse {
    pub shipment_id: i32,
    pub position: i32,
    /// Shipment price frozen at generation
    pub amount_ht: Decimal,
}

impl From<InvoiceLine> for InvoiceLineResponse {
    fn from(l: InvoiceLine) -> Self {
        Self {
            shipment_id: l.shipment_id,
            position: l.position,
            amount_ht: money(l.amount_ht),
        }
    }
}

/// Reference shape
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: i32,
    pub invoice_number: String,
    pub client_id: i32,
    /// In generation order
    pub shipment_ids: Vec<i32>,
    pub lines: Vec<InvoiceLineResponse>,
    pub amount_ht: Decimal,
    pub tva_rate: Decimal,
    pub tva_amount: Decimal,
    pub total_ttc: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub currency: String,
    /// `PENDING`, `PARTIALLY_PAID`, `PAID`, `OVERDUE` or `CANCELLED`
    pub status: String,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceResponse {
    pub fn new(invoice: Invoice, currency: &str) -> Self {
        Self {
            id: invoice.id,
            shipment_ids: invoice.shipment_ids(),
            invoice_number: invoice.invoice_number,
            client_id: invoice.client_id,
            lines: invoice.lines.into_iter().map(Into::into).collect(),
            amount_ht: money(invoice.amount_ht),
            tva_rate: invoice.tva_rate,
            tva_amount: money(invoice.tva_amount),
            total_ttc: money(invoice.total_ttc),
            amount_paid: money(invoice.amount_paid),
            amount_due: money(invoice.amount_due),
            currency: currency.to_string(),
            status: invoice.status.to_string(),
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            notes: invoice.notes,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

/// Expanded shape
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpandedInvoiceResponse {
    pub invoice: InvoiceResponse,
    pub client: ClientResponse,
    pub shipments: Vec<ShipmentResponse>,
    pub payments: Vec<PaymentResponse>,
}

impl ExpandedInvoiceResponse {
    pub fn new(details: InvoiceDetails, currency: &str) -> Self {
        Self {
            invoice: InvoiceResponse::new(details.invoice, currency),
            client: details.client.into(),
            shipments: details.shipments.into_iter().map(Into::into).collect(),
            payments: details.payments.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateInvoiceRequest {
    pub client_id: i32,
    #[validate(length(min = 1, message = "at least one shipment is required"))]
    pub shipment_ids: Vec<i32>,
    /// Defaults to the configured term
    #[validate(range(min = 0, max = 3650))]
    pub due_in_days: Option<i64>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<GenerateInvoiceRequest> for GenerateInvoice {
    fn from(req: GenerateInvoiceRequest) -> Self {
        Self {
            client_id: req.client_id,
            shipment_ids: req.shipment_ids,
            due_in_days: req.due_in_days,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InvoiceListQuery {
    pub client_id: Option<i32>,
    /// e.g. `OVERDUE`
    pub status: Option<String>,
}

/// Evaluation instant for overdue checks
#[derive(Debug, Deserialize, IntoParams)]
pub struct AsOfQuery {
    /// Defaults to now
    pub as_of: Option<DateTime<Utc>>,
}
