//! Shared fixture for integration tests: a fresh in-memory SQLite database
//! per test, migrated by the real migrator and wired to the real services.

#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use freight_billing::application::BillingServices;
use freight_billing::domain::client::{Client, NewClient};
use freight_billing::domain::pricing::PackageMeasure;
use freight_billing::domain::rate::{NewRateRule, NewServiceType, RateRule, ServiceType};
use freight_billing::domain::shipment::{RegisterShipment, Shipment, ShipmentStatus};
use freight_billing::domain::RepositoryProvider;
use freight_billing::shared::retry::RetryConfig;
use freight_billing::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("warn,freight_billing=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub services: BillingServices,
    /// Route priced at 10 per kg, no base rate and no minimum
    pub service_type: ServiceType,
    pub destination_id: i32,
}

pub fn test_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        backoff_multiplier: 2.0,
        max_delay: Duration::from_millis(5),
    }
}

pub async fn spawn_app() -> TestApp {
    init_tracing();

    let db = init_database(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    run_migrations(&db).await.expect("migrations");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let services = BillingServices::new(repos.clone(), test_retry(), 30);

    let service_type = services
        .rates
        .create_service_type(NewServiceType {
            name: "Standard".to_string(),
            description: None,
            multiplier: Decimal::ONE,
        })
        .await
        .expect("service type");

    let app = TestApp {
        db,
        repos,
        services,
        service_type,
        destination_id: 16,
    };
    app.seed_rule(
        app.service_type.id,
        app.destination_id,
        Decimal::ZERO,
        Decimal::from(10),
    )
    .await;
    app
}

impl TestApp {
    /// Open-ended rule that started yesterday
    pub async fn seed_rule(
        &self,
        service_type_id: i32,
        destination_id: i32,
        base_rate: Decimal,
        weight_rate: Decimal,
    ) -> RateRule {
        self.services
            .rates
            .insert_rule(NewRateRule {
                service_type_id,
                destination_id,
                base_rate,
                weight_rate,
                volume_rate: Decimal::ZERO,
                min_charge: Decimal::ZERO,
                effective_from: Utc::now() - ChronoDuration::days(1),
                effective_to: None,
            })
            .await
            .expect("rate rule")
    }

    pub async fn seed_client(&self, name: &str) -> Client {
        self.services
            .clients
            .create_client(NewClient {
                name: name.to_string(),
                email: None,
                phone: None,
            })
            .await
            .expect("client")
    }

    /// Pending shipment whose price is `10 * weight_kg`
    pub async fn seed_shipment(&self, client_id: i32, weight_kg: Decimal) -> Shipment {
        self.services
            .shipments
            .register_shipment(RegisterShipment {
                client_id,
                service_type_id: self.service_type.id,
                destination_id: self.destination_id,
                packages: vec![PackageMeasure::new(weight_kg, Decimal::ZERO, 1)],
                tracking_number: None,
            })
            .await
            .expect("shipment")
    }

    /// Walk a shipment through the delivery flow
    pub async fn deliver(&self, shipment_id: i32) -> Shipment {
        let mut shipment = None;
        for status in [
            ShipmentStatus::PickedUp,
            ShipmentStatus::InTransit,
            ShipmentStatus::OutForDelivery,
            ShipmentStatus::Delivered,
        ] {
            shipment = Some(
                self.services
                    .shipments
                    .update_status(shipment_id, status)
                    .await
                    .expect("status transition"),
            );
        }
        shipment.expect("delivered shipment")
    }

    /// Delivered shipment priced at `amount` (weight = amount / 10)
    pub async fn delivered_shipment(&self, client_id: i32, amount: Decimal) -> Shipment {
        let shipment = self
            .seed_shipment(client_id, amount / Decimal::from(10))
            .await;
        self.deliver(shipment.id).await
    }
}
