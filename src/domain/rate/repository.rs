//! Rate table repository interfaces

use async_trait::async_trait;

use super::model::{NewRateRule, NewServiceType, RateRule, Route, ServiceType};
use crate::domain::DomainResult;

#[async_trait]
pub trait RateRuleRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RateRule>>;
    async fn find_by_route(&self, route: Route) -> DomainResult<Vec<RateRule>>;
    async fn find_all(&self) -> DomainResult<Vec<RateRule>>;
    /// Insert unless an active rule on the same route overlaps the new
    /// window (`OverlappingRule`). Check and insert are one transaction.
    async fn insert_exclusive(&self, rule: NewRateRule) -> DomainResult<RateRule>;
    async fn deactivate(&self, id: i32) -> DomainResult<RateRule>;
}

#[async_trait]
pub trait ServiceTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ServiceType>>;
    async fn find_all(&self) -> DomainResult<Vec<ServiceType>>;
    async fn save(&self, service_type: NewServiceType) -> DomainResult<ServiceType>;
}
