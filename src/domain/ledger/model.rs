//! Client balance journal
//!
//! Every movement of `Client::account_balance` leaves one entry here, in
//! the same unit of work as the movement itself.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerEntryKind {
    PaymentRecorded,
    PaymentReversed,
    InvoiceCancelled,
}

impl LedgerEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentRecorded => "PAYMENT_RECORDED",
            Self::PaymentReversed => "PAYMENT_REVERSED",
            Self::InvoiceCancelled => "INVOICE_CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PAYMENT_RECORDED" => Some(Self::PaymentRecorded),
            "PAYMENT_REVERSED" => Some(Self::PaymentReversed),
            "INVOICE_CANCELLED" => Some(Self::InvoiceCancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub id: i32,
    pub client_id: i32,
    pub invoice_id: i32,
    /// Not a foreign key: reversed payments are deleted
    pub payment_id: Option<i32>,
    pub kind: LedgerEntryKind,
    /// Signed movement applied to the balance
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}
