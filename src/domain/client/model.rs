//! Client domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Billed customer. `account_balance` is a running credit counter moved by
/// the payment ledger; each invoice's `amount_due` is what is owed.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub account_balance: Decimal,
    /// Optimistic concurrency token, bumped on every write
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}
