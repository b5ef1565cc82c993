//! Invoice aggregate

pub mod model;
pub mod repository;

pub use model::{
    generate_invoice_number, Invoice, InvoiceLine, InvoiceStatus, InvoiceTotals, NewInvoice,
    TVA_RATE,
};
pub use repository::InvoiceRepository;
