use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification used by callers to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    StateConflict,
    Concurrency,
    Internal,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("No active rate for service type {service_type_id} to destination {destination_id} at {as_of}")]
    RateNotFound {
        service_type_id: i32,
        destination_id: i32,
        as_of: String,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Shipments not eligible for invoicing: {ids:?}")]
    IneligibleShipments { ids: Vec<i32> },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Payment of {amount} exceeds amount due {amount_due}")]
    Overpayment { amount: Decimal, amount_due: Decimal },

    #[error("Invoice {0} is already paid")]
    InvoiceAlreadyPaid(i32),

    #[error("Invoice {0} is cancelled")]
    InvoiceCancelled(i32),

    #[error("Invoice {0} is paid and cannot be cancelled")]
    CannotCancelPaidInvoice(i32),

    #[error("Rate rule overlaps active rule {existing_id} on the same route")]
    OverlappingRule { existing_id: i32 },

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } | DomainError::RateNotFound { .. } => ErrorKind::NotFound,
            DomainError::InvalidAmount(_)
            | DomainError::IneligibleShipments { .. }
            | DomainError::Validation(_) => ErrorKind::InvalidInput,
            DomainError::Overpayment { .. }
            | DomainError::InvoiceAlreadyPaid(_)
            | DomainError::InvoiceCancelled(_)
            | DomainError::CannotCancelPaidInvoice(_)
            | DomainError::OverlappingRule { .. } => ErrorKind::StateConflict,
            DomainError::Conflict(_) => ErrorKind::Concurrency,
            DomainError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code, safe to expose to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { entity, .. } => match *entity {
                "Client" => "CLIENT_NOT_FOUND",
                "Invoice" => "INVOICE_NOT_FOUND",
                "Payment" => "PAYMENT_NOT_FOUND",
                "Shipment" => "SHIPMENT_NOT_FOUND",
                "RateRule" => "RATE_RULE_NOT_FOUND",
                "ServiceType" => "SERVICE_TYPE_NOT_FOUND",
                _ => "NOT_FOUND",
            },
            DomainError::RateNotFound { .. } => "RATE_NOT_FOUND",
            DomainError::InvalidAmount(_) => "INVALID_AMOUNT",
            DomainError::IneligibleShipments { .. } => "INELIGIBLE_SHIPMENTS",
            DomainError::Validation(_) => "VALIDATION_ERROR",
            DomainError::Overpayment { .. } => "OVERPAYMENT",
            DomainError::InvoiceAlreadyPaid(_) => "INVOICE_ALREADY_PAID",
            DomainError::InvoiceCancelled(_) => "INVOICE_CANCELLED",
            DomainError::CannotCancelPaidInvoice(_) => "CANNOT_CANCEL_PAID_INVOICE",
            DomainError::OverlappingRule { .. } => "OVERLAPPING_RULE",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the operation may succeed if retried against fresh state.
    pub fn is_transient(&self) -> bool {
        match self {
            DomainError::Conflict(_) => true,
            // SQLite reports writer contention as "database is locked" / "busy"
            DomainError::Storage(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("database is locked") || msg.contains("busy")
            }
            _ => false,
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}
