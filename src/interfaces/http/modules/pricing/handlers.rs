//! Quote handler

use axum::{extract::State, Json};
use chrono::Utc;

use super::dto::{QuoteRequest, QuoteResponse};
use crate::domain::pricing::PackageMeasure;
use crate::interfaces::http::common::{error_response, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::ApiState;

/// Price packages on a route without creating a shipment
#[utoipa::path(
    post,
    path = "/api/v1/pricing/quote",
    tag = "Pricing",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote", body = ApiResponse<QuoteResponse>),
        (status = 404, description = "No active rate for the route")
    )
)]
pub async fn quote(
    State(state): State<ApiState>,
    ValidatedJson(req): ValidatedJson<QuoteRequest>,
) -> ApiResult<QuoteResponse> {
    let packages: Vec<PackageMeasure> = req.packages.into_iter().map(Into::into).collect();
    let quote = state
        .services
        .pricing
        .quote(
            req.service_type_id,
            req.destination_id,
            &packages,
            req.as_of.unwrap_or_else(Utc::now),
        )
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(quote.into())))
}
