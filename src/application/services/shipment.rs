//! Shipment registration and status tracking

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::pricing::PricingService;
use crate::domain::shipment::{NewShipment, RegisterShipment, Shipment, ShipmentStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

fn generate_tracking_number() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("SHP-{}", id[..12].to_ascii_uppercase())
}

pub struct ShipmentService {
    repos: Arc<dyn RepositoryProvider>,
    pricing: Arc<PricingService>,
    retry: RetryConfig,
}

impl ShipmentService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        pricing: Arc<PricingService>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            repos,
            pricing,
            retry,
        }
    }

    /// Price the shipment against today's rate and store it with the
    /// breakdown frozen.
    pub async fn register_shipment(&self, req: RegisterShipment) -> DomainResult<Shipment> {
        self.repos
            .clients()
            .find_by_id(req.client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Client", req.client_id))?;

        let quote = self
            .pricing
            .quote(req.service_type_id, req.destination_id, &req.packages, Utc::now())
            .await?;

        let tracking_number = match req.tracking_number {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => generate_tracking_number(),
        };

        let shipment = self
            .repos
            .shipments()
            .save(NewShipment {
                tracking_number,
                client_id: req.client_id,
                service_type_id: req.service_type_id,
                destination_id: req.destination_id,
                pricing: quote.breakdown,
            })
            .await?;
        metrics::counter!("billing_shipments_registered_total").increment(1);
        Ok(shipment)
    }

    pub async fn get_shipment(&self, id: i32) -> DomainResult<Shipment> {
        self.repos
            .shipments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shipment", id))
    }

    pub async fn list_for_client(&self, client_id: i32) -> DomainResult<Vec<Shipment>> {
        self.repos.shipments().find_by_client(client_id).await
    }

    pub async fn update_status(&self, id: i32, status: ShipmentStatus) -> DomainResult<Shipment> {
        retry_with_backoff(
            self.retry.clone(),
            || self.try_update_status(id, status),
            DomainError::is_transient,
            "update_shipment_status",
        )
        .await
    }

    async fn try_update_status(&self, id: i32, status: ShipmentStatus) -> DomainResult<Shipment> {
        let current = self.get_shipment(id).await?;
        if current.is_invoiced {
            warn!(shipment_id = id, "Status change refused: shipment is invoiced");
            return Err(DomainError::Validation(format!(
                "shipment {} is invoiced and cannot change status",
                id
            )));
        }
        if current.status == status {
            return Ok(current);
        }
        if !current.status.can_transition_to(status) {
            return Err(DomainError::Validation(format!(
                "shipment {} cannot move from {} to {}",
                id, current.status, status
            )));
        }

        let updated = self
            .repos
            .shipments()
            .update_status(id, current.version, status)
            .await?;
        info!(shipment_id = id, from = %current.status, to = %status, "Shipment status changed");
        Ok(updated)
    }
}
