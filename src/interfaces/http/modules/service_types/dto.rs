//! Service type DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::rate::{NewServiceType, ServiceType};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceTypeResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Applied to the base rate
    pub multiplier: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ServiceType> for ServiceTypeResponse {
    fn from(st: ServiceType) -> Self {
        Self {
            id: st.id,
            name: st.name,
            description: st.description,
            multiplier: st.multiplier,
            is_active: st.is_active,
            created_at: st.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceTypeRequest {
    #[validate(length(min = 1, max = 100, message = "service type name is required"))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to 1
    pub multiplier: Option<Decimal>,
}

impl From<CreateServiceTypeRequest> for NewServiceType {
    fn from(req: CreateServiceTypeRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            multiplier: req.multiplier.unwrap_or(Decimal::ONE),
        }
    }
}
