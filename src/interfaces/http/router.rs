//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::{
    clients, health, invoices, metrics, payments, pricing, rates, service_types, shipments,
};
use crate::application::BillingServices;

/// State shared by every billing route
#[derive(Clone)]
pub struct ApiState {
    pub services: BillingServices,
    pub db: DatabaseConnection,
    /// ISO code echoed on monetary responses
    pub currency: String,
    pub started_at: Arc<Instant>,
}

impl ApiState {
    pub fn new(services: BillingServices, db: DatabaseConnection, currency: impl Into<String>) -> Self {
        Self {
            services,
            db,
            currency: currency.into(),
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<ApiState> for health::HealthState {
    fn from_ref(s: &ApiState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Rates
        service_types::list_service_types,
        service_types::get_service_type,
        service_types::create_service_type,
        rates::list_rates,
        rates::resolve_rate,
        rates::get_rate,
        rates::create_rate,
        rates::deactivate_rate,
        // Pricing
        pricing::quote,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::get_client_balance,
        clients::get_client_ledger,
        // Shipments
        shipments::create_shipment,
        shipments::list_shipments,
        shipments::get_shipment,
        shipments::update_shipment_status,
        // Invoices
        invoices::generate_invoice,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::get_invoice_expanded,
        invoices::cancel_invoice,
        invoices::check_overdue,
        invoices::sweep_overdue,
        // Payments
        payments::list_payments,
        payments::record_payment,
        payments::cancel_payment,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            service_types::ServiceTypeResponse,
            service_types::CreateServiceTypeRequest,
            rates::RateRuleResponse,
            rates::CreateRateRuleRequest,
            pricing::PackageDto,
            pricing::PriceBreakdownResponse,
            pricing::QuoteRequest,
            pricing::QuoteResponse,
            clients::ClientResponse,
            clients::CreateClientRequest,
            clients::ClientBalanceResponse,
            clients::LedgerEntryResponse,
            shipments::ShipmentResponse,
            shipments::CreateShipmentRequest,
            shipments::UpdateShipmentStatusRequest,
            invoices::InvoiceLineResponse,
            invoices::InvoiceResponse,
            invoices::ExpandedInvoiceResponse,
            invoices::GenerateInvoiceRequest,
            payments::PaymentResponse,
            payments::RecordPaymentRequest,
            payments::PaymentReceiptResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Rates", description = "Service types and time-bounded rate rules per route"),
        (name = "Pricing", description = "Price quotes for a route and package list"),
        (name = "Clients", description = "Billed clients, balances and ledger journal"),
        (name = "Shipments", description = "Shipment registration and status, priced at creation"),
        (name = "Invoices", description = "Invoice generation, cancellation and overdue checks"),
        (name = "Payments", description = "Payments against invoices and their reversal"),
    ),
    info(
        title = "Freight Billing API",
        version = "1.0.0",
        description = "Rate table, pricing, invoicing and payment ledger for a shipping back-office"
    )
)]
pub struct ApiDoc;

/// Build the REST router. `/metrics` is mounted only when a Prometheus
/// recorder handle is supplied.
pub fn create_api_router(state: ApiState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let service_type_routes = Router::new()
        .route(
            "/",
            get(service_types::list_service_types).post(service_types::create_service_type),
        )
        .route("/{id}", get(service_types::get_service_type));

    let rate_routes = Router::new()
        .route("/", get(rates::list_rates).post(rates::create_rate))
        .route("/resolve", get(rates::resolve_rate))
        .route("/{id}", get(rates::get_rate))
        .route("/{id}/deactivate", post(rates::deactivate_rate));

    let pricing_routes = Router::new().route("/quote", post(pricing::quote));

    let client_routes = Router::new()
        .route("/", get(clients::list_clients).post(clients::create_client))
        .route("/{id}", get(clients::get_client))
        .route("/{id}/balance", get(clients::get_client_balance))
        .route("/{id}/ledger", get(clients::get_client_ledger));

    let shipment_routes = Router::new()
        .route(
            "/",
            get(shipments::list_shipments).post(shipments::create_shipment),
        )
        .route("/{id}", get(shipments::get_shipment))
        .route("/{id}/status", put(shipments::update_shipment_status));

    let invoice_routes = Router::new()
        .route(
            "/",
            get(invoices::list_invoices).post(invoices::generate_invoice),
        )
        .route("/overdue-sweep", post(invoices::sweep_overdue))
        .route("/{id}", get(invoices::get_invoice))
        .route("/{id}/expanded", get(invoices::get_invoice_expanded))
        .route("/{id}/cancel", post(invoices::cancel_invoice))
        .route("/{id}/check-overdue", post(invoices::check_overdue))
        .route(
            "/{id}/payments",
            get(payments::list_payments).post(payments::record_payment),
        );

    let payment_routes = Router::new().route("/{id}", delete(payments::cancel_payment));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/service-types", service_type_routes)
        .nest("/api/v1/rates", rate_routes)
        .nest("/api/v1/pricing", pricing_routes)
        .nest("/api/v1/clients", client_routes)
        .nest("/api/v1/shipments", shipment_routes)
        .nest("/api/v1/invoices", invoice_routes)
        .nest("/api/v1/payments", payment_routes)
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(api);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
