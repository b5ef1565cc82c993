//! Invoice REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    AsOfQuery, ExpandedInvoiceResponse, GenerateInvoiceRequest, InvoiceListQuery, InvoiceResponse,
};
use crate::application::services::InvoiceFilter;
use crate::domain::invoice::InvoiceStatus;
use crate::interfaces::http::common::{
    bad_request, error_response, ApiError, ApiResponse, ApiResult, ValidatedJson,
};
use crate::interfaces::http::ApiState;

#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    tag = "Invoices",
    request_body = GenerateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice generated", body = ApiResponse<InvoiceResponse>),
        (status = 400, description = "Ineligible shipments or invalid data"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn generate_invoice(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<GenerateInvoiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<InvoiceResponse>>), ApiError> {
    let invoice = state
        .services
        .invoices
        .generate_invoice(req.into())
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(InvoiceResponse::new(
            invoice,
            &state.currency,
        ))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    tag = "Invoices",
    params(InvoiceListQuery),
    responses(
        (status = 200, description = "Invoices, newest first", body = ApiResponse<Vec<InvoiceResponse>>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn list_invoices(
    State(state): State<ApiState>,
    Query(query): Query<InvoiceListQuery>,
) -> ApiResult<Vec<InvoiceResponse>> {
    let status = match query.status.as_deref() {
        Some(s) => Some(
            InvoiceStatus::from_str(&s.to_uppercase())
                .ok_or_else(|| bad_request(format!("Unknown invoice status: {}", s)))?,
        ),
        None => None,
    };
    let invoices = state
        .services
        .invoices
        .list_invoices(InvoiceFilter {
            client_id: query.client_id,
            status,
        })
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        invoices
            .into_iter()
            .map(|i| InvoiceResponse::new(i, &state.currency))
            .collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice", body = ApiResponse<InvoiceResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_invoice(State(state): State<ApiState>, Path(id): Path<i32>) -> ApiResult<InvoiceResponse> {
    let invoice = state
        .services
        .invoices
        .get_invoice(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(InvoiceResponse::new(
        invoice,
        &state.currency,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}/expanded",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice with client, shipments and payments", body = ApiResponse<ExpandedInvoiceResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_invoice_expanded(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<ExpandedInvoiceResponse> {
    let details = state
        .services
        .invoices
        .get_invoice_details(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(ExpandedInvoiceResponse::new(
        details,
        &state.currency,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/cancel",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Cancelled; shipments released", body = ApiResponse<InvoiceResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Invoice is paid or already cancelled")
    )
)]
pub async fn cancel_invoice(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<InvoiceResponse> {
    let invoice = state
        .services
        .invoices
        .cancel_invoice(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(InvoiceResponse::new(
        invoice,
        &state.currency,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/check-overdue",
    tag = "Invoices",
    params(("id" = i32, Path, description = "Invoice ID"), AsOfQuery),
    responses(
        (status = 200, description = "Invoice after the check", body = ApiResponse<InvoiceResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn check_overdue(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<InvoiceResponse> {
    let invoice = state
        .services
        .invoices
        .check_overdue(id, query.as_of.unwrap_or_else(Utc::now))
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(InvoiceResponse::new(
        invoice,
        &state.currency,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices/overdue-sweep",
    tag = "Invoices",
    params(AsOfQuery),
    responses(
        (status = 200, description = "Invoices flipped to OVERDUE", body = ApiResponse<Vec<InvoiceResponse>>)
    )
)]
pub async fn sweep_overdue(
    State(state): State<ApiState>,
    Query(query): Query<AsOfQuery>,
) -> ApiResult<Vec<InvoiceResponse>> {
    let flipped = state
        .services
        .invoices
        .sweep_overdue(query.as_of.unwrap_or_else(Utc::now))
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        flipped
            .into_iter()
            .map(|i| InvoiceResponse::new(i, &state.currency))
            .collect(),
    )))
}
