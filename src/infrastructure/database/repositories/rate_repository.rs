//! SeaORM implementations of RateRuleRepository and ServiceTypeRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::db_err;
use crate::domain::rate::{
    find_overlap, NewRateRule, NewServiceType, RateRule, RateRuleRepository, Route, ServiceType,
    ServiceTypeRepository,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{rate_rule, service_type};
use crate::shared::money::{from_db, to_db};

// ── Conversion helpers ──────────────────────────────────────────

fn rule_to_domain(m: rate_rule::Model) -> DomainResult<RateRule> {
    Ok(RateRule {
        id: m.id,
        service_type_id: m.service_type_id,
        destination_id: m.destination_id,
        base_rate: from_db("rate_rules.base_rate", &m.base_rate)?,
        weight_rate: from_db("rate_rules.weight_rate", &m.weight_rate)?,
        volume_rate: from_db("rate_rules.volume_rate", &m.volume_rate)?,
        min_charge: from_db("rate_rules.min_charge", &m.min_charge)?,
        effective_from: m.effective_from,
        effective_to: m.effective_to,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn service_type_to_domain(m: service_type::Model) -> DomainResult<ServiceType> {
    Ok(ServiceType {
        id: m.id,
        multiplier: from_db("service_types.multiplier", &m.multiplier)?,
        name: m.name,
        description: m.description,
        is_active: m.is_active,
        created_at: m.created_at,
    })
}

fn rules_to_domain(models: Vec<rate_rule::Model>) -> DomainResult<Vec<RateRule>> {
    models.into_iter().map(rule_to_domain).collect()
}

// ── SeaOrmRateRuleRepository ────────────────────────────────────

pub struct SeaOrmRateRuleRepository {
    db: DatabaseConnection,
}

impl SeaOrmRateRuleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RateRuleRepository for SeaOrmRateRuleRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RateRule>> {
        let model = rate_rule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(rule_to_domain).transpose()
    }

    async fn find_by_route(&self, route: Route) -> DomainResult<Vec<RateRule>> {
        let models = rate_rule::Entity::find()
            .filter(rate_rule::Column::ServiceTypeId.eq(route.service_type_id))
            .filter(rate_rule::Column::DestinationId.eq(route.destination_id))
            .order_by_asc(rate_rule::Column::EffectiveFrom)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        rules_to_domain(models)
    }

    async fn find_all(&self) -> DomainResult<Vec<RateRule>> {
        let models = rate_rule::Entity::find()
            .order_by_asc(rate_rule::Column::ServiceTypeId)
            .order_by_asc(rate_rule::Column::DestinationId)
            .order_by_asc(rate_rule::Column::EffectiveFrom)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        rules_to_domain(models)
    }

    async fn insert_exclusive(&self, rule: NewRateRule) -> DomainResult<RateRule> {
        let window = rule.validate()?;
        let route = rule.route();

        // Overlap check and insert share one transaction
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = rate_rule::Entity::find()
            .filter(rate_rule::Column::ServiceTypeId.eq(route.service_type_id))
            .filter(rate_rule::Column::DestinationId.eq(route.destination_id))
            .filter(rate_rule::Column::IsActive.eq(true))
            .all(&txn)
            .await
            .map_err(db_err)?;
        let existing = rules_to_domain(existing)?;
        if let Some(clash) = find_overlap(&existing, route, &window) {
            return Err(DomainError::OverlappingRule {
                existing_id: clash.id,
            });
        }

        let now = Utc::now();
        let model = rate_rule::ActiveModel {
            id: NotSet,
            service_type_id: Set(rule.service_type_id),
            destination_id: Set(rule.destination_id),
            base_rate: Set(to_db(rule.base_rate)),
            weight_rate: Set(to_db(rule.weight_rate)),
            volume_rate: Set(to_db(rule.volume_rate)),
            min_charge: Set(to_db(rule.min_charge)),
            effective_from: Set(rule.effective_from),
            effective_to: Set(rule.effective_to),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!(rule_id = inserted.id, route = %route, "Rate rule inserted");
        rule_to_domain(inserted)
    }

    async fn deactivate(&self, id: i32) -> DomainResult<RateRule> {
        let existing = rate_rule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("RateRule", id))?;

        let mut model: rate_rule::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(Utc::now());
        let updated = model.update(&self.db).await.map_err(db_err)?;

        info!(rule_id = id, "Rate rule deactivated");
        rule_to_domain(updated)
    }
}

// ── SeaOrmServiceTypeRepository ─────────────────────────────────

pub struct SeaOrmServiceTypeRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceTypeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceTypeRepository for SeaOrmServiceTypeRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ServiceType>> {
        let model = service_type::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(service_type_to_domain).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<ServiceType>> {
        let models = service_type::Entity::find()
            .order_by_asc(service_type::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(service_type_to_domain).collect()
    }

    async fn save(&self, st: NewServiceType) -> DomainResult<ServiceType> {
        let duplicate = service_type::Entity::find()
            .filter(service_type::Column::Name.eq(st.name.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            return Err(DomainError::Validation(format!(
                "service type '{}' already exists",
                st.name
            )));
        }

        let model = service_type::ActiveModel {
            id: NotSet,
            name: Set(st.name),
            description: Set(st.description),
            multiplier: Set(to_db(st.multiplier)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        info!(service_type_id = inserted.id, name = %inserted.name, "Service type saved");
        service_type_to_domain(inserted)
    }
}
