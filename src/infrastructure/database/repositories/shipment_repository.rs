//! SeaORM implementation of ShipmentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use super::{conflict, db_err};
use crate::domain::pricing::PriceBreakdown;
use crate::domain::shipment::{NewShipment, Shipment, ShipmentRepository, ShipmentStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::shipment;
use crate::shared::money::{from_db, to_db};

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn status_to_entity(s: ShipmentStatus) -> shipment::ShipmentStatus {
    match s {
        ShipmentStatus::Pending => shipment::ShipmentStatus::Pending,
        ShipmentStatus::PickedUp => shipment::ShipmentStatus::PickedUp,
        ShipmentStatus::InTransit => shipment::ShipmentStatus::InTransit,
        ShipmentStatus::OutForDelivery => shipment::ShipmentStatus::OutForDelivery,
        ShipmentStatus::Delivered => shipment::ShipmentStatus::Delivered,
        ShipmentStatus::Returned => shipment::ShipmentStatus::Returned,
        ShipmentStatus::Failed => shipment::ShipmentStatus::Failed,
        ShipmentStatus::Cancelled => shipment::ShipmentStatus::Cancelled,
    }
}

fn status_to_domain(s: shipment::ShipmentStatus) -> ShipmentStatus {
    match s {
        shipment::ShipmentStatus::Pending => ShipmentStatus::Pending,
        shipment::ShipmentStatus::PickedUp => ShipmentStatus::PickedUp,
        shipment::ShipmentStatus::InTransit => ShipmentStatus::InTransit,
        shipment::ShipmentStatus::OutForDelivery => ShipmentStatus::OutForDelivery,
        shipment::ShipmentStatus::Delivered => ShipmentStatus::Delivered,
        shipment::ShipmentStatus::Returned => ShipmentStatus::Returned,
        shipment::ShipmentStatus::Failed => ShipmentStatus::Failed,
        shipment::ShipmentStatus::Cancelled => ShipmentStatus::Cancelled,
    }
}

fn model_to_domain(m: shipment::Model) -> DomainResult<Shipment> {
    let pricing = PriceBreakdown {
        base_amount: from_db("shipments.base_amount", &m.base_amount)?,
        weight_amount: from_db("shipments.weight_amount", &m.weight_amount)?,
        volume_amount: from_db("shipments.volume_amount", &m.volume_amount)?,
        total_amount: from_db("shipments.total_amount", &m.total_amount)?,
        base_rate: from_db("shipments.base_rate", &m.base_rate)?,
        weight_rate: from_db("shipments.weight_rate", &m.weight_rate)?,
        volume_rate: from_db("shipments.volume_rate", &m.volume_rate)?,
        service_multiplier: from_db("shipments.service_multiplier", &m.service_multiplier)?,
        total_weight: from_db("shipments.total_weight", &m.total_weight)?,
        total_volume: from_db("shipments.total_volume", &m.total_volume)?,
        min_charge_applied: m.min_charge_applied,
    };
    Ok(Shipment {
        id: m.id,
        tracking_number: m.tracking_number,
        client_id: m.client_id,
        service_type_id: m.service_type_id,
        destination_id: m.destination_id,
        status: status_to_domain(m.status),
        pricing,
        is_invoiced: m.is_invoiced,
        invoice_id: m.invoice_id,
        version: m.version,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn models_to_domain(models: Vec<shipment::Model>) -> DomainResult<Vec<Shipment>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── ShipmentRepository impl ─────────────────────────────────────

pub struct SeaOrmShipmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmShipmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShipmentRepository for SeaOrmShipmentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Shipment>> {
        let model = shipment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Shipment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = shipment::Entity::find()
            .filter(shipment::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_client(&self, client_id: i32) -> DomainResult<Vec<Shipment>> {
        let models = shipment::Entity::find()
            .filter(shipment::Column::ClientId.eq(client_id))
            .order_by_asc(shipment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_invoice(&self, invoice_id: i32) -> DomainResult<Vec<Shipment>> {
        let models = shipment::Entity::find()
            .filter(shipment::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(shipment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn save(&self, s: NewShipment) -> DomainResult<Shipment> {
        let duplicate = shipment::Entity::find()
            .filter(shipment::Column::TrackingNumber.eq(s.tracking_number.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if duplicate.is_some() {
            return Err(DomainError::Validation(format!(
                "tracking number '{}' already exists",
                s.tracking_number
            )));
        }

        let now = Utc::now();
        let p = s.pricing;
        let model = shipment::ActiveModel {
            id: NotSet,
            tracking_number: Set(s.tracking_number),
            client_id: Set(s.client_id),
            service_type_id: Set(s.service_type_id),
            destination_id: Set(s.destination_id),
            status: Set(shipment::ShipmentStatus::Pending),
            base_amount: Set(to_db(p.base_amount)),
            weight_amount: Set(to_db(p.weight_amount)),
            volume_amount: Set(to_db(p.volume_amount)),
            total_amount: Set(to_db(p.total_amount)),
            base_rate: Set(to_db(p.base_rate)),
            weight_rate: Set(to_db(p.weight_rate)),
            volume_rate: Set(to_db(p.volume_rate)),
            service_multiplier: Set(to_db(p.service_multiplier)),
            total_weight: Set(to_db(p.total_weight)),
            total_volume: Set(to_db(p.total_volume)),
            min_charge_applied: Set(p.min_charge_applied),
            is_invoiced: Set(false),
            invoice_id: Set(None),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        info!(
            shipment_id = inserted.id,
            tracking_number = %inserted.tracking_number,
            total = %p.total_amount,
            "Shipment registered"
        );
        model_to_domain(inserted)
    }

    async fn update_status(
        &self,
        id: i32,
        expected_version: i32,
        status: ShipmentStatus,
    ) -> DomainResult<Shipment> {
        let update = shipment::ActiveModel {
            status: Set(status_to_entity(status)),
            version: Set(expected_version + 1),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        // Invoiced shipments are frozen
        let result = shipment::Entity::update_many()
            .set(update)
            .filter(shipment::Column::Id.eq(id))
            .filter(shipment::Column::Version.eq(expected_version))
            .filter(shipment::Column::IsInvoiced.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected != 1 {
            return Err(conflict("Shipment", id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shipment", id))
    }
}
