//! Price calculation for a shipment's packages
//!
//! Each monetary component is rounded to cents on its own. The grand total
//! is computed from the unrounded components, floored at the minimum
//! charge, then rounded. The displayed components can therefore sum to a
//! cent away from the total; consumers of existing price records rely on
//! this exact behaviour.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::rate::RateRule;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;
use crate::shared::money::round2;

/// Measurements of one package line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMeasure {
    /// Weight of a single package, kg
    pub weight: Decimal,
    /// Volume of a single package, m³
    pub volume: Decimal,
    pub quantity: u32,
}

impl PackageMeasure {
    pub fn new(weight: Decimal, volume: Decimal, quantity: u32) -> Self {
        Self {
            weight,
            volume,
            quantity,
        }
    }
}

/// Price breakdown frozen onto a shipment at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_amount: Decimal,
    pub weight_amount: Decimal,
    pub volume_amount: Decimal,
    /// Grand total after the minimum-charge floor
    pub total_amount: Decimal,
    pub base_rate: Decimal,
    pub weight_rate: Decimal,
    pub volume_rate: Decimal,
    pub service_multiplier: Decimal,
    pub total_weight: Decimal,
    pub total_volume: Decimal,
    /// True when the minimum charge replaced the computed total
    pub min_charge_applied: bool,
}

/// Price `packages` with `rate`. A missing multiplier counts as 1.
pub fn calculate_price(
    rate: &RateRule,
    packages: &[PackageMeasure],
    service_multiplier: Option<Decimal>,
) -> DomainResult<PriceBreakdown> {
    let multiplier = service_multiplier.unwrap_or(Decimal::ONE);
    if multiplier < Decimal::ZERO {
        return Err(DomainError::Validation(
            "service multiplier must not be negative".to_string(),
        ));
    }

    let mut total_weight = Decimal::ZERO;
    let mut total_volume = Decimal::ZERO;
    for (i, package) in packages.iter().enumerate() {
        if package.weight < Decimal::ZERO || package.volume < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "package {}: weight and volume must not be negative",
                i + 1
            )));
        }
        if package.quantity == 0 {
            return Err(DomainError::Validation(format!(
                "package {}: quantity must be at least 1",
                i + 1
            )));
        }
        let quantity = Decimal::from(package.quantity);
        total_weight = package
            .weight
            .checked_mul(quantity)
            .and_then(|w| total_weight.checked_add(w))
            .ok_or_else(|| out_of_range("total weight"))?;
        total_volume = package
            .volume
            .checked_mul(quantity)
            .and_then(|v| total_volume.checked_add(v))
            .ok_or_else(|| out_of_range("total volume"))?;
    }

    let base = rate
        .base_rate
        .checked_mul(multiplier)
        .ok_or_else(|| out_of_range("base amount"))?;
    let weight = total_weight
        .checked_mul(rate.weight_rate)
        .ok_or_else(|| out_of_range("weight amount"))?;
    let volume = total_volume
        .checked_mul(rate.volume_rate)
        .ok_or_else(|| out_of_range("volume amount"))?;

    let raw_total = base
        .checked_add(weight)
        .and_then(|t| t.checked_add(volume))
        .ok_or_else(|| out_of_range("total amount"))?;
    let min_charge_applied = raw_total < rate.min_charge;
    let total = if min_charge_applied {
        rate.min_charge
    } else {
        raw_total
    };

    Ok(PriceBreakdown {
        base_amount: round2(base),
        weight_amount: round2(weight),
        volume_amount: round2(volume),
        total_amount: round2(total),
        base_rate: rate.base_rate,
        weight_rate: rate.weight_rate,
        volume_rate: rate.volume_rate,
        service_multiplier: multiplier,
        total_weight,
        total_volume,
        min_charge_applied,
    })
}

fn out_of_range(what: &str) -> DomainError {
    DomainError::Validation(format!("{} out of range", what))
}

// ── Tests ──────────────────────────────────────────────────────
