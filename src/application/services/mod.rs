//! Application services

mod client;
mod invoice;
mod payment_ledger;
mod pricing;
mod rate_table;
mod shipment;

pub use client::ClientService;
pub use invoice::{GenerateInvoice, InvoiceDetails, InvoiceFilter, InvoiceService};
pub use payment_ledger::{ClientBalanceSummary, PaymentLedgerService, PaymentReceipt, RecordPayment};
pub use pricing::{PricingService, Quote};
pub use rate_table::RateTableService;
pub use shipment::ShipmentService;
