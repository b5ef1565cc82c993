//! Quote DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::services::Quote;
use crate::domain::pricing::{PackageMeasure, PriceBreakdown};
use crate::interfaces::http::common::money;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PackageDto {
    /// Weight of one package, kg
    pub weight: Decimal,
    /// Volume of one package, m³
    pub volume: Decimal,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
}

impl From<PackageDto> for PackageMeasure {
    fn from(p: PackageDto) -> Self {
        PackageMeasure::new(p.weight, p.volume, p.quantity)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceBreakdownResponse {
    pub base_amount: Decimal,
    pub weight_amount: Decimal,
    pub volume_amount: Decimal,
    pub total_amount: Decimal,
    pub base_rate: Decimal,
    pub weight_rate: Decimal,
    pub volume_rate: Decimal,
    pub service_multiplier: Decimal,
    pub total_weight: Decimal,
    pub total_volume: Decimal,
    pub min_charge_applied: bool,
}

impl From<PriceBreakdown> for PriceBreakdownResponse {
    fn from(p: PriceBreakdown) -> Self {
        Self {
            base_amount: money(p.base_amount),
            weight_amount: money(p.weight_amount),
            volume_amount: money(p.volume_amount),
            total_amount: money(p.total_amount),
            base_rate: p.base_rate,
            weight_rate: p.weight_rate,
            volume_rate: p.volume_rate,
            service_multiplier: p.service_multiplier,
            total_weight: p.total_weight,
            total_volume: p.total_volume,
            min_charge_applied: p.min_charge_applied,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub service_type_id: i32,
    pub destination_id: i32,
    #[validate(nested)]
    pub packages: Vec<PackageDto>,
    /// Pricing date; defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub rate_rule_id: i32,
    pub breakdown: PriceBreakdownResponse,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            rate_rule_id: q.rate_rule_id,
            breakdown: q.breakdown.into(),
        }
    }
}
