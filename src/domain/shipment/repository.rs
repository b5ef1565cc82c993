//! Shipment repository interface

use async_trait::async_trait;

use super::model::{NewShipment, Shipment, ShipmentStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Shipment>>;
    /// Shipments among `ids`; missing ids are simply absent from the result
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Shipment>>;
    async fn find_by_client(&self, client_id: i32) -> DomainResult<Vec<Shipment>>;
    async fn find_by_invoice(&self, invoice_id: i32) -> DomainResult<Vec<Shipment>>;
    async fn save(&self, shipment: NewShipment) -> DomainResult<Shipment>;
    /// Compare-and-swap on `expected_version`; `Conflict` if it moved
    async fn update_status(
        &self,
        id: i32,
        expected_version: i32,
        status: ShipmentStatus,
    ) -> DomainResult<Shipment>;
}
