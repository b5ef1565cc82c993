//! Rate table and pricing integration tests

mod common;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use freight_billing::domain::pricing::PackageMeasure;
use freight_billing::domain::rate::{NewRateRule, NewServiceType, Route};
use freight_billing::domain::DomainError;

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn rule(
    service_type_id: i32,
    destination_id: i32,
    from: DateTime<Utc>,
    to: Option<DateTime<Utc>>,
) -> NewRateRule {
    NewRateRule {
        service_type_id,
        destination_id,
        base_rate: dec!(500),
        weight_rate: dec!(20),
        volume_rate: dec!(100),
        min_charge: dec!(800),
        effective_from: from,
        effective_to: to,
    }
}

#[tokio::test]
async fn overlapping_rule_is_rejected() {
    let app = common::spawn_app().await;
    let st = app.service_type.id;

    app.services
        .rates
        .insert_rule(rule(st, 31, day(2024, 1, 1), Some(day(2024, 6, 30))))
        .await
        .unwrap();

    let err = app
        .services
        .rates
        .insert_rule(rule(st, 31, day(2024, 3, 1), None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::OverlappingRule { .. }));

    // Only the first rule exists on the route
    let rules = app
        .services
        .rates
        .list_rules(Some(Route::new(st, 31)))
        .await
        .unwrap();
    assert_eq!(rules.len(), 1);
}

#[tokio::test]
async fn adjacent_window_and_other_route_are_accepted() {
    let app = common::spawn_app().await;
    let st = app.service_type.id;

    app.services
        .rates
        .insert_rule(rule(st, 31, day(2024, 1, 1), Some(day(2024, 6, 30))))
        .await
        .unwrap();
    app.services
        .rates
        .insert_rule(rule(st, 31, day(2024, 7, 1), None))
        .await
        .unwrap();
    app.services
        .rates
        .insert_rule(rule(st, 9, day(2024, 3, 1), None))
        .await
        .unwrap();

    let rules = app
        .services
        .rates
        .list_rules(Some(Route::new(st, 31)))
        .await
        .unwrap();
    assert_eq!(rules.len(), 2);
}

#[tokio::test]
async fn resolve_picks_rule_in_force_at_date() {
    let app = common::spawn_app().await;
    let st = app.service_type.id;

    let first = app
        .services
        .rates
        .insert_rule(rule(st, 31, day(2024, 1, 1), Some(day(2024, 6, 30))))
        .await
        .unwrap();
    let second = app
        .services
        .rates
        .insert_rule(rule(st, 31, day(2024, 7, 1), None))
        .await
        .unwrap();

    let at_march = app
        .services
        .rates
        .resolve_active_rate(st, 31, day(2024, 3, 15))
        .await
        .unwrap();
    assert_eq!(at_march.id, first.id);

    // Inclusive end bound
    let at_end = app
        .services
        .rates
        .resolve_active_rate(st, 31, day(2024, 6, 30))
        .await
        .unwrap();
    assert_eq!(at_end.id, first.id);

    let later = app
        .services
        .rates
        .resolve_active_rate(st, 31, day(2030, 1, 1))
        .await
        .unwrap();
    assert_eq!(later.id, second.id);

    let err = app
        .services
        .rates
        .resolve_active_rate(st, 31, day(2023, 12, 31))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RateNotFound { .. }));
}

#[tokio::test]
async fn deactivated_rule_frees_its_window() {
    let app = common::spawn_app().await;
    let st = app.service_type.id;

    let old = app
        .services
        .rates
        .insert_rule(rule(st, 31, day(2024, 1, 1), None))
        .await
        .unwrap();
    let deactivated = app.services.rates.deactivate_rule(old.id).await.unwrap();
    assert!(!deactivated.is_active);

    let err = app
        .services
        .rates
        .resolve_active_rate(st, 31, day(2024, 2, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RateNotFound { .. }));

    let replacement = app
        .services
        .rates
        .insert_rule(rule(st, 31, day(2024, 1, 1), None))
        .await
        .unwrap();
    let resolved = app
        .services
        .rates
        .resolve_active_rate(st, 31, day(2024, 2, 1))
        .await
        .unwrap();
    assert_eq!(resolved.id, replacement.id);
}

#[tokio::test]
async fn rule_for_unknown_service_type_is_not_found() {
    let app = common::spawn_app().await;
    let err = app
        .services
        .rates
        .insert_rule(rule(999, 31, day(2024, 1, 1), None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "ServiceType", .. }));
}

#[tokio::test]
async fn quote_applies_service_multiplier_and_min_charge() {
    let app = common::spawn_app().await;
    let express = app
        .services
        .rates
        .create_service_type(NewServiceType {
            name: "Express".to_string(),
            description: Some("Next day".to_string()),
            multiplier: dec!(1.5),
        })
        .await
        .unwrap();
    app.services
        .rates
        .insert_rule(rule(express.id, 31, day(2024, 1, 1), None))
        .await
        .unwrap();

    // 500 * 1.5 + 2 * 3kg * 20 + 2 * 0.05m3 * 100 = 750 + 120 + 10
    let quote = app
        .services
        .pricing
        .quote(
            express.id,
            31,
            &[PackageMeasure::new(dec!(3), dec!(0.05), 2)],
            day(2024, 5, 1),
        )
        .await
        .unwrap();
    assert_eq!(quote.breakdown.base_amount, dec!(750));
    assert_eq!(quote.breakdown.total_amount, dec!(880));
    assert!(!quote.breakdown.min_charge_applied);

    // A light parcel on the standard type hits the 800 floor
    app.services
        .rates
        .insert_rule(rule(app.service_type.id, 31, day(2024, 1, 1), None))
        .await
        .unwrap();
    let floor = app
        .services
        .pricing
        .quote(
            app.service_type.id,
            31,
            &[PackageMeasure::new(dec!(1), dec!(0), 1)],
            day(2024, 5, 1),
        )
        .await
        .unwrap();
    assert_eq!(floor.breakdown.total_amount, dec!(800));
    assert!(floor.breakdown.min_charge_applied);
}

#[tokio::test]
async fn quote_without_rate_fails() {
    let app = common::spawn_app().await;
    let err = app
        .services
        .pricing
        .quote(app.service_type.id, 404, &[], Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RateNotFound { .. }));
}

#[tokio::test]
async fn shipment_price_is_frozen_at_creation() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Sahara Logistics").await;
    let shipment = app.seed_shipment(client.id, dec!(7)).await;
    assert_eq!(shipment.total_amount(), dec!(70));

    // Replace the seeded rule with a pricier one
    let current = app
        .services
        .rates
        .resolve_active_rate(app.service_type.id, app.destination_id, Utc::now())
        .await
        .unwrap();
    app.services.rates.deactivate_rule(current.id).await.unwrap();
    app.seed_rule(app.service_type.id, app.destination_id, dec!(0), dec!(99))
        .await;

    let reloaded = app.services.shipments.get_shipment(shipment.id).await.unwrap();
    assert_eq!(reloaded.total_amount(), dec!(70));
    assert!(reloaded.tracking_number.starts_with("SHP-"));
}
