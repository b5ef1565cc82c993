//! Rate table service: rule resolution and maintenance

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::rate::{select_applicable, NewRateRule, NewServiceType, RateRule, Route, ServiceType};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

pub struct RateTableService {
    repos: Arc<dyn RepositoryProvider>,
    retry: RetryConfig,
}

impl RateTableService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, retry: RetryConfig) -> Self {
        Self { repos, retry }
    }

    /// The active rule covering `as_of` on the route. No fallback pricing.
    pub async fn resolve_active_rate(
        &self,
        service_type_id: i32,
        destination_id: i32,
        as_of: DateTime<Utc>,
    ) -> DomainResult<RateRule> {
        let route = Route::new(service_type_id, destination_id);
        let rules = self.repos.rates().find_by_route(route).await?;
        select_applicable(&rules, route, as_of)
            .cloned()
            .ok_or_else(|| DomainError::RateNotFound {
                service_type_id,
                destination_id,
                as_of: as_of.to_rfc3339(),
            })
    }

    /// Add a rule, refusing any overlap with an active rule on the route.
    pub async fn insert_rule(&self, rule: NewRateRule) -> DomainResult<RateRule> {
        rule.validate()?;
        self.require_service_type(rule.service_type_id).await?;

        let result = retry_with_backoff(
            self.retry.clone(),
            || self.repos.rates().insert_exclusive(rule.clone()),
            DomainError::is_transient,
            "insert_rate_rule",
        )
        .await;

        match &result {
            Ok(inserted) => {
                metrics::counter!("billing_rate_rules_created_total").increment(1);
                info!(rule_id = inserted.id, route = %inserted.route(), "Rate rule added");
            }
            Err(DomainError::OverlappingRule { existing_id }) => {
                warn!(
                    route = %rule.route(),
                    existing_id,
                    "Rate rule rejected: overlapping window"
                );
            }
            Err(_) => {}
        }
        result
    }

    pub async fn list_rules(&self, route: Option<Route>) -> DomainResult<Vec<RateRule>> {
        match route {
            Some(route) => self.repos.rates().find_by_route(route).await,
            None => self.repos.rates().find_all().await,
        }
    }

    pub async fn get_rule(&self, id: i32) -> DomainResult<RateRule> {
        self.repos
            .rates()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("RateRule", id))
    }

    /// Retire a rule. Its window becomes free for a replacement.
    pub async fn deactivate_rule(&self, id: i32) -> DomainResult<RateRule> {
        self.repos.rates().deactivate(id).await
    }

    pub async fn create_service_type(&self, st: NewServiceType) -> DomainResult<ServiceType> {
        if st.name.trim().is_empty() {
            return Err(DomainError::Validation("service type name is required".to_string()));
        }
        if st.multiplier < Decimal::ZERO {
            return Err(DomainError::Validation(
                "multiplier must not be negative".to_string(),
            ));
        }
        self.repos.service_types().save(st).await
    }

    pub async fn list_service_types(&self) -> DomainResult<Vec<ServiceType>> {
        self.repos.service_types().find_all().await
    }

    pub async fn get_service_type(&self, id: i32) -> DomainResult<ServiceType> {
        self.require_service_type(id).await
    }

    /// Multiplier for the service type; 1 when it is missing or inactive.
    pub async fn service_multiplier(&self, service_type_id: i32) -> DomainResult<Decimal> {
        let st = self.repos.service_types().find_by_id(service_type_id).await?;
        Ok(match st {
            Some(st) if st.is_active => st.multiplier,
            _ => Decimal::ONE,
        })
    }

    async fn require_service_type(&self, id: i32) -> DomainResult<ServiceType> {
        self.repos
            .service_types()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceType", id))
    }
}
