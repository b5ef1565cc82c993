//! Rate table REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{CreateRateRuleRequest, RateListQuery, RateRuleResponse, ResolveRateQuery};
use crate::domain::rate::Route;
use crate::interfaces::http::common::{
    bad_request, error_response, ApiError, ApiResponse, ApiResult, ValidatedJson,
};
use crate::interfaces::http::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/rates",
    tag = "Rates",
    params(RateListQuery),
    responses(
        (status = 200, description = "Rate rules", body = ApiResponse<Vec<RateRuleResponse>>),
        (status = 400, description = "Incomplete route filter")
    )
)]
pub async fn list_rates(
    State(state): State<ApiState>,
    Query(query): Query<RateListQuery>,
) -> ApiResult<Vec<RateRuleResponse>> {
    let route = match (query.service_type_id, query.destination_id) {
        (Some(st), Some(dest)) => Some(Route::new(st, dest)),
        (None, None) => None,
        _ => {
            return Err(bad_request(
                "service_type_id and destination_id must be given together",
            ))
        }
    };
    let rules = state
        .services
        .rates
        .list_rules(route)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        rules.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/rates/resolve",
    tag = "Rates",
    params(ResolveRateQuery),
    responses(
        (status = 200, description = "Rule in force", body = ApiResponse<RateRuleResponse>),
        (status = 404, description = "No active rate for the route")
    )
)]
pub async fn resolve_rate(
    State(state): State<ApiState>,
    Query(query): Query<ResolveRateQuery>,
) -> ApiResult<RateRuleResponse> {
    let rule = state
        .services
        .rates
        .resolve_active_rate(
            query.service_type_id,
            query.destination_id,
            query.as_of.unwrap_or_else(Utc::now),
        )
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(rule.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/rates/{id}",
    tag = "Rates",
    params(("id" = i32, Path, description = "Rate rule ID")),
    responses(
        (status = 200, description = "Rate rule", body = ApiResponse<RateRuleResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_rate(State(state): State<ApiState>, Path(id): Path<i32>) -> ApiResult<RateRuleResponse> {
    let rule = state
        .services
        .rates
        .get_rule(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(rule.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/rates",
    tag = "Rates",
    request_body = CreateRateRuleRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<RateRuleResponse>),
        (status = 400, description = "Invalid data"),
        (status = 409, description = "Overlaps an active rule on the same route")
    )
)]
pub async fn create_rate(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<CreateRateRuleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RateRuleResponse>>), ApiError> {
    let rule = state
        .services
        .rates
        .insert_rule(req.into())
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rule.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/rates/{id}/deactivate",
    tag = "Rates",
    params(("id" = i32, Path, description = "Rate rule ID")),
    responses(
        (status = 200, description = "Deactivated", body = ApiResponse<RateRuleResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn deactivate_rate(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<RateRuleResponse> {
    let rule = state
        .services
        .rates
        .deactivate_rule(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(rule.into())))
}
