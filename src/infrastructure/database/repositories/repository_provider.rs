//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::client::ClientRepository;
use crate::domain::invoice::InvoiceRepository;
use crate::domain::ledger::LedgerRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::rate::{RateRuleRepository, ServiceTypeRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::shipment::ShipmentRepository;

use super::client_repository::SeaOrmClientRepository;
use super::invoice_repository::SeaOrmInvoiceRepository;
use super::ledger_repository::SeaOrmLedgerRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::rate_repository::{SeaOrmRateRuleRepository, SeaOrmServiceTypeRepository};
use super::shipment_repository::SeaOrmShipmentRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let invoice = repos.invoices().find_by_id(42).await?;
/// let entries = repos.ledger().find_by_client(7).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    service_types: SeaOrmServiceTypeRepository,
    rates: SeaOrmRateRuleRepository,
    clients: SeaOrmClientRepository,
    shipments: SeaOrmShipmentRepository,
    invoices: SeaOrmInvoiceRepository,
    payments: SeaOrmPaymentRepository,
    ledger: SeaOrmLedgerRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            service_types: SeaOrmServiceTypeRepository::new(db.clone()),
            rates: SeaOrmRateRuleRepository::new(db.clone()),
            clients: SeaOrmClientRepository::new(db.clone()),
            shipments: SeaOrmShipmentRepository::new(db.clone()),
            invoices: SeaOrmInvoiceRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            ledger: SeaOrmLedgerRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn service_types(&self) -> &dyn ServiceTypeRepository {
        &self.service_types
    }

    fn rates(&self) -> &dyn RateRuleRepository {
        &self.rates
    }

    fn clients(&self) -> &dyn ClientRepository {
        &self.clients
    }

    fn shipments(&self) -> &dyn ShipmentRepository {
        &self.shipments
    }

    fn invoices(&self) -> &dyn InvoiceRepository {
        &self.invoices
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn ledger(&self) -> &dyn LedgerRepository {
        &self.ledger
    }
}
