//! Invoice generation and lifecycle integration tests

mod common;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use freight_billing::application::{GenerateInvoice, InvoiceFilter};
use freight_billing::domain::invoice::InvoiceStatus;
use freight_billing::domain::shipment::ShipmentStatus;
use freight_billing::domain::DomainError;

fn request(client_id: i32, shipment_ids: Vec<i32>) -> GenerateInvoice {
    GenerateInvoice {
        client_id,
        shipment_ids,
        due_in_days: None,
        notes: None,
    }
}

#[tokio::test]
async fn invoice_totals_include_tva() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let a = app.delivered_shipment(client.id, dec!(100)).await;
    let b = app.delivered_shipment(client.id, dec!(50)).await;

    let invoice = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![a.id, b.id]))
        .await
        .unwrap();

    assert_eq!(invoice.amount_ht, dec!(150.00));
    assert_eq!(invoice.tva_amount, dec!(28.50));
    assert_eq!(invoice.total_ttc, dec!(178.50));
    assert_eq!(invoice.amount_paid, dec!(0));
    assert_eq!(invoice.amount_due, dec!(178.50));
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.shipment_ids(), vec![a.id, b.id]);
    assert!(invoice.invoice_number.starts_with("INV-"));
    assert_eq!(invoice.due_date - invoice.issue_date, Duration::days(30));

    for id in [a.id, b.id] {
        let s = app.services.shipments.get_shipment(id).await.unwrap();
        assert!(s.is_invoiced);
        assert_eq!(s.invoice_id, Some(invoice.id));
    }
}

#[tokio::test]
async fn line_order_follows_request_order() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let a = app.delivered_shipment(client.id, dec!(10)).await;
    let b = app.delivered_shipment(client.id, dec!(20)).await;
    let c = app.delivered_shipment(client.id, dec!(30)).await;

    let invoice = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![c.id, a.id, b.id]))
        .await
        .unwrap();
    assert_eq!(invoice.shipment_ids(), vec![c.id, a.id, b.id]);

    let reloaded = app.services.invoices.get_invoice(invoice.id).await.unwrap();
    assert_eq!(reloaded.shipment_ids(), vec![c.id, a.id, b.id]);
}

#[tokio::test]
async fn undelivered_shipment_fails_whole_batch() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let delivered = app.delivered_shipment(client.id, dec!(100)).await;
    let pending = app.seed_shipment(client.id, dec!(5)).await;

    let err = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![delivered.id, pending.id]))
        .await
        .unwrap_err();
    match err {
        DomainError::IneligibleShipments { ids } => assert_eq!(ids, vec![pending.id]),
        other => panic!("unexpected error: {other:?}"),
    }

    // Nothing was claimed
    let s = app.services.shipments.get_shipment(delivered.id).await.unwrap();
    assert!(!s.is_invoiced);
    assert!(app
        .services
        .invoices
        .list_invoices(InvoiceFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn other_clients_and_missing_shipments_are_ineligible() {
    let app = common::spawn_app().await;
    let owner = app.seed_client("Owner").await;
    let other = app.seed_client("Other").await;
    let theirs = app.delivered_shipment(owner.id, dec!(40)).await;

    let err = app
        .services
        .invoices
        .generate_invoice(request(other.id, vec![theirs.id, 9999]))
        .await
        .unwrap_err();
    match err {
        DomainError::IneligibleShipments { ids } => assert_eq!(ids, vec![theirs.id, 9999]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn returned_shipment_is_billable() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let s = app.delivered_shipment(client.id, dec!(25)).await;
    app.services
        .shipments
        .update_status(s.id, ShipmentStatus::Returned)
        .await
        .unwrap();

    let invoice = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![s.id]))
        .await
        .unwrap();
    assert_eq!(invoice.amount_ht, dec!(25));
}

#[tokio::test]
async fn empty_and_duplicate_requests_are_rejected() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let s = app.delivered_shipment(client.id, dec!(25)).await;

    let empty = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(empty, DomainError::Validation(_)));

    let dup = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![s.id, s.id]))
        .await
        .unwrap_err();
    assert!(matches!(dup, DomainError::Validation(_)));

    let unknown_client = app
        .services
        .invoices
        .generate_invoice(request(4242, vec![s.id]))
        .await
        .unwrap_err();
    assert!(matches!(unknown_client, DomainError::NotFound { entity: "Client", .. }));
}

#[tokio::test]
async fn shipment_is_never_on_two_invoices() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let s = app.delivered_shipment(client.id, dec!(100)).await;

    let first = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![s.id]))
        .await
        .unwrap();

    let err = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![s.id]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::IneligibleShipments { .. }));

    // Once the first invoice is cancelled the shipment can be billed again
    app.services.invoices.cancel_invoice(first.id).await.unwrap();
    let second = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![s.id]))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn concurrent_generation_claims_shipment_once() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let s = app.delivered_shipment(client.id, dec!(100)).await;

    let (a, b) = tokio::join!(
        app.services
            .invoices
            .generate_invoice(request(client.id, vec![s.id])),
        app.services
            .invoices
            .generate_invoice(request(client.id, vec![s.id])),
    );
    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one generation may succeed"
    );

    let open = app
        .services
        .invoices
        .list_invoices(InvoiceFilter {
            client_id: Some(client.id),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn invoiced_shipment_cannot_change_status() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let s = app.delivered_shipment(client.id, dec!(100)).await;
    app.services
        .invoices
        .generate_invoice(request(client.id, vec![s.id]))
        .await
        .unwrap();

    let err = app
        .services
        .shipments
        .update_status(s.id, ShipmentStatus::Returned)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn check_overdue_is_idempotent() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let s = app.delivered_shipment(client.id, dec!(100)).await;
    let invoice = app
        .services
        .invoices
        .generate_invoice(GenerateInvoice {
            due_in_days: Some(10),
            ..request(client.id, vec![s.id])
        })
        .await
        .unwrap();

    // Not yet due
    let before = app
        .services
        .invoices
        .check_overdue(invoice.id, Utc::now())
        .await
        .unwrap();
    assert_eq!(before.status, InvoiceStatus::Pending);

    let later = Utc::now() + Duration::days(11);
    let first = app
        .services
        .invoices
        .check_overdue(invoice.id, later)
        .await
        .unwrap();
    assert_eq!(first.status, InvoiceStatus::Overdue);

    let second = app
        .services
        .invoices
        .check_overdue(invoice.id, later)
        .await
        .unwrap();
    assert_eq!(second.status, InvoiceStatus::Overdue);
    assert_eq!(second.version, first.version);
    assert_eq!(second.updated_at, first.updated_at);
}

#[tokio::test]
async fn sweep_flags_only_past_due_open_invoices() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;

    let mut ids = Vec::new();
    for (amount, days) in [(dec!(10), 5), (dec!(20), 60)] {
        let s = app.delivered_shipment(client.id, amount).await;
        let inv = app
            .services
            .invoices
            .generate_invoice(GenerateInvoice {
                due_in_days: Some(days),
                ..request(client.id, vec![s.id])
            })
            .await
            .unwrap();
        ids.push(inv.id);
    }

    let now = Utc::now() + Duration::days(7);
    let flagged = app.services.invoices.sweep_overdue(now).await.unwrap();
    assert_eq!(flagged.iter().map(|i| i.id).collect::<Vec<_>>(), vec![ids[0]]);

    // A second sweep finds nothing new
    assert!(app.services.invoices.sweep_overdue(now).await.unwrap().is_empty());

    let overdue = app
        .services
        .invoices
        .list_invoices(InvoiceFilter {
            client_id: None,
            status: Some(InvoiceStatus::Overdue),
        })
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
}

#[tokio::test]
async fn expanded_invoice_resolves_references() {
    let app = common::spawn_app().await;
    let client = app.seed_client("Atlas Freight").await;
    let a = app.delivered_shipment(client.id, dec!(100)).await;
    let b = app.delivered_shipment(client.id, dec!(50)).await;
    let invoice = app
        .services
        .invoices
        .generate_invoice(request(client.id, vec![b.id, a.id]))
        .await
        .unwrap();

    let details = app
        .services
        .invoices
        .get_invoice_details(invoice.id)
        .await
        .unwrap();
    assert_eq!(details.client.id, client.id);
    assert_eq!(
        details.shipments.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![b.id, a.id]
    );
    assert!(details.payments.is_empty());
}
