//! Billing domain: aggregates, their invariants and repository interfaces

pub mod client;
pub mod invoice;
pub mod ledger;
pub mod payment;
pub mod pricing;
pub mod rate;
pub mod repositories;
pub mod shipment;

// Re-export commonly used types
pub use client::Client;
pub use invoice::{Invoice, InvoiceStatus};
pub use ledger::{LedgerEntry, LedgerEntryKind};
pub use payment::{Payment, PaymentMethod};
pub use pricing::{calculate_price, PackageMeasure, PriceBreakdown};
pub use rate::{RateRule, Route, ServiceType};
pub use repositories::{DomainResult, RepositoryProvider};
pub use shipment::{Shipment, ShipmentStatus};

pub use crate::shared::errors::DomainError;
