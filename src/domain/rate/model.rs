//! Rate rule domain entity
//!
//! A rate rule prices one route (service type + destination) over an
//! effective window. Windows are inclusive on both ends; an open
//! `effective_to` extends to infinity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Pricing lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    pub service_type_id: i32,
    pub destination_id: i32,
}

impl Route {
    pub fn new(service_type_id: i32, destination_id: i32) -> Self {
        Self {
            service_type_id,
            destination_id,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.service_type_id, self.destination_id)
    }
}

/// Inclusive validity window of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveWindow {
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
}

impl EffectiveWindow {
    pub fn new(from: DateTime<Utc>, to: Option<DateTime<Utc>>) -> DomainResult<Self> {
        if let Some(to) = to {
            if to < from {
                return Err(DomainError::Validation(
                    "effective_to must not be before effective_from".to_string(),
                ));
            }
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && self.to.map_or(true, |to| at <= to)
    }

    pub fn overlaps(&self, other: &EffectiveWindow) -> bool {
        let self_starts_before_other_ends = other.to.map_or(true, |to| self.from <= to);
        let other_starts_before_self_ends = self.to.map_or(true, |to| other.from <= to);
        self_starts_before_other_ends && other_starts_before_self_ends
    }
}

/// Time-bounded pricing rule for a route
#[derive(Debug, Clone)]
pub struct RateRule {
    pub id: i32,
    pub service_type_id: i32,
    pub destination_id: i32,
    /// Flat amount per shipment, before the service multiplier
    pub base_rate: Decimal,
    /// Amount per kilogram
    pub weight_rate: Decimal,
    /// Amount per cubic metre
    pub volume_rate: Decimal,
    /// Floor applied to the grand total
    pub min_charge: Decimal,
    pub effective_from: DateTime<Utc>,
    pub effective_to: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RateRule {
    pub fn route(&self) -> Route {
        Route::new(self.service_type_id, self.destination_id)
    }

    pub fn window(&self) -> EffectiveWindow {
        EffectiveWindow {
            from: self.effective_from,
            to: self.effective_to,
        }
    }

    /// Active and effective at `at`
    pub fn applies_at(&self, at: DateTime<Utc>) -> bool {
        self.is_active && self.window().contains(at)
    }
}

/// Rule as submitted by an operator, before persistence
#[derive(Debug, Clone)]
pub struct NewRateRule {
    pub service_type_id: i32,
    pub destination_id: i32,
    pub base_rate: Decimal,
    pub weight_rate: Decimal,
    pub volume_rate: Decimal,
    pub min_charge: Decimal,
    pub effective_from: DateTime<Utc>,
    pub effective_to: Option<DateTime<Utc>>,
}

impl NewRateRule {
    pub fn route(&self) -> Route {
        Route::new(self.service_type_id, self.destination_id)
    }

    pub fn validate(&self) -> DomainResult<EffectiveWindow> {
        for (name, value) in [
            ("base_rate", self.base_rate),
            ("weight_rate", self.weight_rate),
            ("volume_rate", self.volume_rate),
            ("min_charge", self.min_charge),
        ] {
            if value < Decimal::ZERO {
                return Err(DomainError::Validation(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }
        EffectiveWindow::new(self.effective_from, self.effective_to)
    }
}

/// First active rule on the same route whose window intersects `window`.
pub fn find_overlap<'a>(
    existing: &'a [RateRule],
    route: Route,
    window: &EffectiveWindow,
) -> Option<&'a RateRule> {
    existing
        .iter()
        .filter(|r| r.is_active && r.route() == route)
        .find(|r| r.window().overlaps(window))
}

/// The rule that applies to `route` at `at`. The latest `effective_from`
/// wins should legacy data ever contain overlaps.
pub fn select_applicable(rules: &[RateRule], route: Route, at: DateTime<Utc>) -> Option<&RateRule> {
    rules
        .iter()
        .filter(|r| r.route() == route && r.applies_at(at))
        .max_by_key(|r| r.effective_from)
}

/// Service type with its price multiplier
#[derive(Debug, Clone)]
pub struct ServiceType {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub multiplier: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewServiceType {
    pub name: String,
    pub description: Option<String>,
    pub multiplier: Decimal,
}

// ── Tests ──────────────────────────────────────────────────────
