//! Shipment domain entity (billing-relevant view)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::pricing::{PackageMeasure, PriceBreakdown};

/// Shipment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentStatus {
    Pending,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Returned,
    Failed,
    Cancelled,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::PickedUp => "PICKED_UP",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Returned => "RETURNED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "PICKED_UP" => Some(Self::PickedUp),
            "IN_TRANSIT" => Some(Self::InTransit),
            "OUT_FOR_DELIVERY" => Some(Self::OutForDelivery),
            "DELIVERED" => Some(Self::Delivered),
            "RETURNED" => Some(Self::Returned),
            "FAILED" => Some(Self::Failed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Only delivered or returned shipments can be invoiced
    pub fn is_billable(&self) -> bool {
        matches!(self, Self::Delivered | Self::Returned)
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Returned | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: ShipmentStatus) -> bool {
        use ShipmentStatus::*;
        match (self, next) {
            (Pending, PickedUp | Cancelled) => true,
            (PickedUp, InTransit | Failed | Cancelled) => true,
            (InTransit, OutForDelivery | Failed | Returned) => true,
            (OutForDelivery, Delivered | Failed | Returned) => true,
            (Failed, InTransit | Returned) => true,
            (Delivered, Returned) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shipment as seen by the billing core
#[derive(Debug, Clone)]
pub struct Shipment {
    pub id: i32,
    pub tracking_number: String,
    pub client_id: i32,
    pub service_type_id: i32,
    pub destination_id: i32,
    pub status: ShipmentStatus,
    /// Frozen at creation; never recomputed when rates change
    pub pricing: PriceBreakdown,
    pub is_invoiced: bool,
    pub invoice_id: Option<i32>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Tax-exclusive price
    pub fn total_amount(&self) -> Decimal {
        self.pricing.total_amount
    }

    pub fn is_eligible_for_invoice(&self, client_id: i32) -> bool {
        self.client_id == client_id && !self.is_invoiced && self.status.is_billable()
    }
}

/// Shipment registration request, priced before it is stored
#[derive(Debug, Clone)]
pub struct RegisterShipment {
    pub client_id: i32,
    pub service_type_id: i32,
    pub destination_id: i32,
    pub packages: Vec<PackageMeasure>,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewShipment {
    pub tracking_number: String,
    pub client_id: i32,
    pub service_type_id: i32,
    pub destination_id: i32,
    pub pricing: PriceBreakdown,
}

// ── Tests ──────────────────────────────────────────────────────
