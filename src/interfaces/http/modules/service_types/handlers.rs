//! Service type REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateServiceTypeRequest, ServiceTypeResponse};
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/service-types",
    tag = "Rates",
    responses(
        (status = 200, description = "Service types", body = ApiResponse<Vec<ServiceTypeResponse>>)
    )
)]
pub async fn list_service_types(State(state): State<ApiState>) -> ApiResult<Vec<ServiceTypeResponse>> {
    let types = state
        .services
        .rates
        .list_service_types()
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        types.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/service-types/{id}",
    tag = "Rates",
    params(("id" = i32, Path, description = "Service type ID")),
    responses(
        (status = 200, description = "Service type", body = ApiResponse<ServiceTypeResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_service_type(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<ServiceTypeResponse> {
    let st = state
        .services
        .rates
        .get_service_type(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(st.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/service-types",
    tag = "Rates",
    request_body = CreateServiceTypeRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ServiceTypeResponse>),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn create_service_type(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<CreateServiceTypeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceTypeResponse>>), ApiError> {
    let st = state
        .services
        .rates
        .create_service_type(req.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(st.into()))))
}
