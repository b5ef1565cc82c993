//! Database entities module

pub mod client;
pub mod invoice;
pub mod invoice_line;
pub mod ledger_entry;
pub mod payment;
pub mod rate_rule;
pub mod service_type;
pub mod shipment;

pub use client::Entity as Client;
pub use invoice::Entity as Invoice;
pub use invoice_line::Entity as InvoiceLine;
pub use ledger_entry::Entity as LedgerEntry;
pub use payment::Entity as Payment;
pub use rate_rule::Entity as RateRule;
pub use service_type::Entity as ServiceType;
pub use shipment::Entity as Shipment;
