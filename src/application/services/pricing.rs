//! Quotes: rate resolution followed by price calculation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::rate_table::RateTableService;
use crate::domain::pricing::{calculate_price, PackageMeasure, PriceBreakdown};
use crate::domain::DomainResult;

/// Priced route, with the rule that produced it
#[derive(Debug, Clone)]
pub struct Quote {
    pub rate_rule_id: i32,
    pub breakdown: PriceBreakdown,
}

pub struct PricingService {
    rates: Arc<RateTableService>,
}

impl PricingService {
    pub fn new(rates: Arc<RateTableService>) -> Self {
        Self { rates }
    }

    pub async fn quote(
        &self,
        service_type_id: i32,
        destination_id: i32,
        packages: &[PackageMeasure],
        as_of: DateTime<Utc>,
    ) -> DomainResult<Quote> {
        let rule = self
            .rates
            .resolve_active_rate(service_type_id, destination_id, as_of)
            .await?;
        let multiplier = self.rates.service_multiplier(service_type_id).await?;
        let breakdown = calculate_price(&rule, packages, Some(multiplier))?;

        debug!(
            rule_id = rule.id,
            service_type_id,
            destination_id,
            total = %breakdown.total_amount,
            "Quote computed"
        );
        Ok(Quote {
            rate_rule_id: rule.id,
            breakdown,
        })
    }
}
