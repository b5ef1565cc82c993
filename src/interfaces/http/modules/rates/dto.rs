//! Rate rule DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::rate::{NewRateRule, RateRule};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RateRuleResponse {
    pub id: i32,
    pub service_type_id: i32,
    pub destination_id: i32,
    pub base_rate: Decimal,
    pub weight_rate: Decimal,
    pub volume_rate: Decimal,
    pub min_charge: Decimal,
    pub effective_from: DateTime<Utc>,
    /// `null` means open-ended
    pub effective_to: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RateRule> for RateRuleResponse {
    fn from(r: RateRule) -> Self {
        Self {
            id: r.id,
            service_type_id: r.service_type_id,
            destination_id: r.destination_id,
            base_rate: r.base_rate,
            weight_rate: r.weight_rate,
            volume_rate: r.volume_rate,
            min_charge: r.min_charge,
            effective_from: r.effective_from,
            effective_to: r.effective_to,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRateRuleRequest {
    #[validate(range(min = 1, message = "service_type_id must be positive"))]
    pub service_type_id: i32,
    #[validate(range(min = 1, message = "destination_id must be positive"))]
    pub destination_id: i32,
    pub base_rate: Decimal,
    /// Per kilogram
    pub weight_rate: Decimal,
    /// Per cubic metre
    pub volume_rate: Decimal,
    #[serde(default)]
    pub min_charge: Decimal,
    pub effective_from: DateTime<Utc>,
    pub effective_to: Option<DateTime<Utc>>,
}

impl From<CreateRateRuleRequest> for NewRateRule {
    fn from(req: CreateRateRuleRequest) -> Self {
        Self {
            service_type_id: req.service_type_id,
            destination_id: req.destination_id,
            base_rate: req.base_rate,
            weight_rate: req.weight_rate,
            volume_rate: req.volume_rate,
            min_charge: req.min_charge,
            effective_from: req.effective_from,
            effective_to: req.effective_to,
        }
    }
}

/// Optional route filter for the rule list
#[derive(Debug, Deserialize, IntoParams)]
pub struct RateListQuery {
    pub service_type_id: Option<i32>,
    pub destination_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResolveRateQuery {
    pub service_type_id: i32,
    pub destination_id: i32,
    /// Defaults to now
    pub as_of: Option<DateTime<Utc>>,
}
