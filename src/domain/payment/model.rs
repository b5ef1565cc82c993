//! Payment domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Cash,
    Check,
    BankTransfer,
    Card,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Check => "CHECK",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Card => "CARD",
            Self::Other => "OTHER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(Self::Cash),
            "CHECK" => Some(Self::Check),
            "BANK_TRANSFER" => Some(Self::BankTransfer),
            "CARD" => Some(Self::Card),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money received against one invoice
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i32,
    pub invoice_id: i32,
    pub client_id: i32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub invoice_id: i32,
    pub client_id: i32,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_date: DateTime<Utc>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_wire_names() {
        assert_eq!(PaymentMethod::from_str("BANK_TRANSFER"), Some(PaymentMethod::BankTransfer));
        assert_eq!(PaymentMethod::Check.to_string(), "CHECK");
        assert_eq!(PaymentMethod::from_str("bitcoin"), None);
    }
}
