pub mod clients;
pub mod health;
pub mod invoices;
pub mod metrics;
pub mod payments;
pub mod pricing;
pub mod rates;
pub mod service_types;
pub mod shipments;
