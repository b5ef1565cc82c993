//! Client REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{ClientBalanceResponse, ClientResponse, CreateClientRequest, LedgerEntryResponse};
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "All clients", body = ApiResponse<Vec<ClientResponse>>)
    )
)]
pub async fn list_clients(State(state): State<ApiState>) -> ApiResult<Vec<ClientResponse>> {
    let clients = state
        .services
        .clients
        .list_clients()
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        clients.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client", body = ApiResponse<ClientResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_client(State(state): State<ApiState>, Path(id): Path<i32>) -> ApiResult<ClientResponse> {
    let client = state
        .services
        .clients
        .get_client(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(client.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "Clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ClientResponse>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_client(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ClientResponse>>), ApiError> {
    let client = state
        .services
        .clients
        .create_client(req.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(client.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/balance",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Balance summary", body = ApiResponse<ClientBalanceResponse>),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client_balance(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<ClientBalanceResponse> {
    let summary = state
        .services
        .payments
        .client_balance_summary(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(ClientBalanceResponse::new(
        summary,
        &state.currency,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/ledger",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Balance journal, oldest first", body = ApiResponse<Vec<LedgerEntryResponse>>),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client_ledger(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<LedgerEntryResponse>> {
    let entries = state
        .services
        .payments
        .client_ledger(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(Into::into).collect(),
    )))
}
