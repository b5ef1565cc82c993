//! REST API tests driving the router in-process

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use freight_billing::interfaces::http::{create_api_router, ApiState};

async fn router() -> (common::TestApp, Router) {
    let app = common::spawn_app().await;
    let state = ApiState::new(app.services.clone(), app.db.clone(), "DZD");
    let router = create_api_router(state, None);
    (app, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_database_ok() {
    let (_app, router) = router().await;
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn invoice_flow_over_http() {
    let (app, router) = router().await;
    let client = app.seed_client("Atlas Freight").await;
    let a = app.delivered_shipment(client.id, dec!(100)).await;
    let b = app.delivered_shipment(client.id, dec!(50)).await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/invoices",
        Some(json!({ "client_id": client.id, "shipment_ids": [a.id, b.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let invoice = &body["data"];
    assert_eq!(invoice["amount_ht"], "150.00");
    assert_eq!(invoice["tva_amount"], "28.50");
    assert_eq!(invoice["total_ttc"], "178.50");
    assert_eq!(invoice["status"], "PENDING");
    assert_eq!(invoice["currency"], "DZD");
    assert_eq!(invoice["shipment_ids"], json!([a.id, b.id]));
    let id = invoice["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        Method::POST,
        &format!("/api/v1/invoices/{id}/payments"),
        Some(json!({ "amount": "178.50", "method": "bank_transfer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["invoice"]["status"], "PAID");
    assert_eq!(body["data"]["invoice"]["amount_due"], "0.00");
    assert_eq!(body["data"]["payment"]["method"], "BANK_TRANSFER");

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/api/v1/invoices/{id}/expanded"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["client"]["id"], client.id);
    assert_eq!(body["data"]["shipments"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["payments"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/api/v1/clients/{}/balance", client.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["account_balance"], "178.50");
    assert_eq!(body["data"]["pending_invoices_count"], 0);
}

#[tokio::test]
async fn overpayment_maps_to_conflict() {
    let (app, router) = router().await;
    let client = app.seed_client("Atlas Freight").await;
    let s = app.delivered_shipment(client.id, dec!(84.03)).await;
    let (_, body) = send(
        &router,
        Method::POST,
        "/api/v1/invoices",
        Some(json!({ "client_id": client.id, "shipment_ids": [s.id] })),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/invoices/{id}/payments");

    let (status, _) = send(&router, Method::POST, &uri, Some(json!({ "amount": "60" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, Method::POST, &uri, Some(json!({ "amount": "50" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "OVERPAYMENT");

    let (_, body) = send(&router, Method::GET, &format!("/api/v1/invoices/{id}"), None).await;
    assert_eq!(body["data"]["amount_due"], "40.00");
    assert_eq!(body["data"]["status"], "PARTIALLY_PAID");
}

#[tokio::test]
async fn ineligible_shipments_are_listed() {
    let (app, router) = router().await;
    let client = app.seed_client("Atlas Freight").await;
    let pending = app.seed_shipment(client.id, dec!(3)).await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/invoices",
        Some(json!({ "client_id": client.id, "shipment_ids": [pending.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INELIGIBLE_SHIPMENTS");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains(&pending.id.to_string()));
}

#[tokio::test]
async fn validation_and_not_found_errors() {
    let (_app, router) = router().await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/invoices",
        Some(json!({ "client_id": 1, "shipment_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&router, Method::GET, "/api/v1/invoices/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "INVOICE_NOT_FOUND");

    let (status, body) = send(&router, Method::DELETE, "/api/v1/payments/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PAYMENT_NOT_FOUND");

    let (status, _) = send(&router, Method::GET, "/api/v1/invoices?status=lost", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_package_quote_is_a_bad_request() {
    let (app, router) = router().await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/pricing/quote",
        Some(json!({
            "service_type_id": app.service_type.id,
            "destination_id": app.destination_id,
            "packages": [{ "weight": "39614081257132168796771975167", "volume": "0", "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // router still serves requests afterwards
    let (status, _) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn overlapping_rate_rule_over_http() {
    let (app, router) = router().await;
    let st = app.service_type.id;

    let (status, _) = send(
        &router,
        Method::POST,
        "/api/v1/rates",
        Some(json!({
            "service_type_id": st,
            "destination_id": 31,
            "base_rate": "500",
            "weight_rate": "20",
            "volume_rate": "100",
            "min_charge": "800",
            "effective_from": "2024-01-01T00:00:00Z",
            "effective_to": "2024-06-30T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/rates",
        Some(json!({
            "service_type_id": st,
            "destination_id": 31,
            "base_rate": "450",
            "weight_rate": "20",
            "volume_rate": "100",
            "effective_from": "2024-03-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "OVERLAPPING_RULE");

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/api/v1/rates/resolve?service_type_id={st}&destination_id=31&as_of=2024-04-01T00:00:00Z"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["base_rate"], "500");
}

#[tokio::test]
async fn shipment_lifecycle_over_http() {
    let (app, router) = router().await;
    let client = app.seed_client("Atlas Freight").await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/v1/shipments",
        Some(json!({
            "client_id": client.id,
            "service_type_id": app.service_type.id,
            "destination_id": app.destination_id,
            "packages": [{ "weight": "2.5", "volume": "0", "quantity": 2 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["total_amount"], "50.00");
    assert_eq!(body["data"]["status"], "PENDING");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/api/v1/shipments/{id}/status"),
        Some(json!({ "status": "DELIVERED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &router,
        Method::PUT,
        &format!("/api/v1/shipments/{id}/status"),
        Some(json!({ "status": "picked_up" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PICKED_UP");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_app, router) = router().await;
    let (status, body) = send(&router, Method::GET, "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/invoices/{id}/payments"].is_object());
}
