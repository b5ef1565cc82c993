//! Shipment DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::shipment::{RegisterShipment, Shipment};
use crate::interfaces::http::common::money;
use crate::interfaces::http::modules::pricing::{PackageDto, PriceBreakdownResponse};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShipmentResponse {
    pub id: i32,
    pub tracking_number: String,
    pub client_id: i32,
    pub service_type_id: i32,
    pub destination_id: i32,
    /// e.g. `DELIVERED`
    pub status: String,
    pub total_amount: Decimal,
    pub pricing: PriceBreakdownResponse,
    pub is_invoiced: bool,
    pub invoice_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Shipment> for ShipmentResponse {
    fn from(s: Shipment) -> Self {
        Self {
            id: s.id,
            total_amount: money(s.total_amount()),
            tracking_number: s.tracking_number,
            client_id: s.client_id,
            service_type_id: s.service_type_id,
            destination_id: s.destination_id,
            status: s.status.to_string(),
            pricing: s.pricing.into(),
            is_invoiced: s.is_invoiced,
            invoice_id: s.invoice_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShipmentRequest {
    pub client_id: i32,
    pub service_type_id: i32,
    pub destination_id: i32,
    #[validate(nested)]
    pub packages: Vec<PackageDto>,
    /// Generated when absent
    #[validate(length(min = 1, max = 64))]
    pub tracking_number: Option<String>,
}

impl From<CreateShipmentRequest> for RegisterShipment {
    fn from(req: CreateShipmentRequest) -> Self {
        Self {
            client_id: req.client_id,
            service_type_id: req.service_type_id,
            destination_id: req.destination_id,
            packages: req.packages.into_iter().map(Into::into).collect(),
            tracking_number: req.tracking_number,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateShipmentStatusRequest {
    /// Target status, e.g. `DELIVERED`
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ShipmentListQuery {
    pub client_id: i32,
}
