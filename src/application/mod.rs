//! Application layer: use cases over the domain repositories

pub mod services;

use std::sync::Arc;

use crate::domain::RepositoryProvider;
use crate::shared::retry::RetryConfig;

pub use services::{
    ClientBalanceSummary, ClientService, GenerateInvoice, InvoiceDetails, InvoiceFilter,
    InvoiceService, PaymentLedgerService, PaymentReceipt, PricingService, Quote,
    RateTableService, RecordPayment, ShipmentService,
};

/// Every service, wired to one repository provider
#[derive(Clone)]
pub struct BillingServices {
    pub rates: Arc<RateTableService>,
    pub pricing: Arc<PricingService>,
    pub clients: Arc<ClientService>,
    pub shipments: Arc<ShipmentService>,
    pub invoices: Arc<InvoiceService>,
    pub payments: Arc<PaymentLedgerService>,
}

impl BillingServices {
    pub fn new(repos: Arc<dyn RepositoryProvider>, retry: RetryConfig, default_due_days: i64) -> Self {
        let rates = Arc::new(RateTableService::new(repos.clone(), retry.clone()));
        let pricing = Arc::new(PricingService::new(rates.clone()));
        Self {
            clients: Arc::new(ClientService::new(repos.clone())),
            shipments: Arc::new(ShipmentService::new(
                repos.clone(),
                pricing.clone(),
                retry.clone(),
            )),
            invoices: Arc::new(InvoiceService::new(
                repos.clone(),
                retry.clone(),
                default_due_days,
            )),
            payments: Arc::new(PaymentLedgerService::new(repos, retry)),
            rates,
            pricing,
        }
    }
}
