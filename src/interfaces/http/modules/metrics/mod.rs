//! Prometheus exposition and HTTP request metrics
//!
//! Domain counters are emitted by the application services:
//! `billing_invoices_generated_total`, `billing_invoices_cancelled_total`,
//! `billing_invoices_overdue_total`, `billing_payments_recorded_total`,
//! `billing_payments_cancelled_total`, `billing_rate_rules_created_total`,
//! `billing_shipments_registered_total` and `billing_conflicts_total`.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// Register help text for every series this service emits.
pub fn describe_metrics() {
    describe_counter!("http_requests_total", "HTTP requests by method, route and status");
    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "HTTP request latency by method and route"
    );
    describe_counter!("billing_invoices_generated_total", "Invoices generated");
    describe_counter!("billing_invoices_cancelled_total", "Invoices cancelled");
    describe_counter!("billing_invoices_overdue_total", "Invoices flipped to OVERDUE");
    describe_counter!("billing_payments_recorded_total", "Payments recorded");
    describe_counter!("billing_payments_cancelled_total", "Payments reversed");
    describe_counter!("billing_rate_rules_created_total", "Rate rules inserted");
    describe_counter!("billing_shipments_registered_total", "Shipments registered and priced");
    describe_counter!(
        "billing_conflicts_total",
        "Optimistic concurrency conflicts by entity"
    );
    describe_counter!("billing_retries_total", "Retried operations after a transient failure");
}

/// `GET /metrics`
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}

/// Counts requests and records latency, labelled by the matched route so
/// ids in paths do not explode cardinality.
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => route.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => route)
        .record(elapsed);

    response
}
