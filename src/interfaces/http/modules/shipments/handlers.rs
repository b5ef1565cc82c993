//! Shipment REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateShipmentRequest, ShipmentListQuery, ShipmentResponse, UpdateShipmentStatusRequest,
};
use crate::domain::shipment::ShipmentStatus;
use crate::interfaces::http::common::{
    bad_request, error_response, ApiError, ApiResponse, ApiResult, ValidatedJson,
};
use crate::interfaces::http::ApiState;

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    tag = "Shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 201, description = "Shipment registered and priced", body = ApiResponse<ShipmentResponse>),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Unknown client or no active rate")
    )
)]
pub async fn create_shipment(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShipmentResponse>>), ApiError> {
    let shipment = state
        .services
        .shipments
        .register_shipment(req.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(shipment.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    tag = "Shipments",
    params(ShipmentListQuery),
    responses(
        (status = 200, description = "Shipments of a client", body = ApiResponse<Vec<ShipmentResponse>>)
    )
)]
pub async fn list_shipments(
    State(state): State<ApiState>,
    Query(query): Query<ShipmentListQuery>,
) -> ApiResult<Vec<ShipmentResponse>> {
    let shipments = state
        .services
        .shipments
        .list_for_client(query.client_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        shipments.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}",
    tag = "Shipments",
    params(("id" = i32, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment", body = ApiResponse<ShipmentResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_shipment(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<ShipmentResponse> {
    let shipment = state
        .services
        .shipments
        .get_shipment(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(shipment.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/shipments/{id}/status",
    tag = "Shipments",
    params(("id" = i32, Path, description = "Shipment ID")),
    request_body = UpdateShipmentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ShipmentResponse>),
        (status = 400, description = "Unknown status, invalid transition or invoiced shipment"),
        (status = 409, description = "Concurrent modification")
    )
)]
pub async fn update_shipment_status(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateShipmentStatusRequest>,
) -> ApiResult<ShipmentResponse> {
    let status = ShipmentStatus::from_str(&req.status.to_uppercase())
        .ok_or_else(|| bad_request(format!("Unknown shipment status: {}", req.status)))?;
    let shipment = state
        .services
        .shipments
        .update_status(id, status)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(shipment.into())))
}
