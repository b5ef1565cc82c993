//! JSON body extractor that also runs `validator` rules
//!
//! Malformed bodies are answered with 400 `INVALID_JSON`; bodies that parse
//! but break a field rule get 422 `VALIDATION_ERROR` listing every failing
//! field as `field: message`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// `Json<T>` plus `Validate::validate()`.
///
/// ```ignore
/// pub async fn record_payment(
///     State(state): State<ApiState>,
///     Path(invoice_id): Path<i32>,
///     ValidatedJson(req): ValidatedJson<RecordPaymentRequest>,
/// ) -> Result<Json<ApiResponse<PaymentReceiptResponse>>, ApiError> {
///     // `req.reference` and `req.notes` already fit their length limits
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(ValidationErrors),
}

/// `field: message` for each failed rule, sorted by field name
fn describe_field_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error_with_code(
                    format!("Invalid JSON: {}", rejection.body_text()),
                    "INVALID_JSON",
                ),
            ),
            Self::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiResponse::<()>::error_with_code(
                    describe_field_errors(&errors),
                    "VALIDATION_ERROR",
                ),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::interfaces::http::modules::invoices::GenerateInvoiceRequest;
    use crate::interfaces::http::modules::payments::RecordPaymentRequest;

    async fn accept_invoice(ValidatedJson(req): ValidatedJson<GenerateInvoiceRequest>) -> String {
        req.shipment_ids.len().to_string()
    }

    async fn accept_payment(ValidatedJson(req): ValidatedJson<RecordPaymentRequest>) -> String {
        req.amount.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/invoices", post(accept_invoice))
            .route("/payments", post(accept_payment))
    }

    async fn post_raw(uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn valid_invoice_request_reaches_handler() {
        let body = json!({ "client_id": 3, "shipment_ids": [7, 8], "due_in_days": 45 });
        let (status, bytes) = post_raw("/invoices", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"2");
    }

    #[tokio::test]
    async fn payment_amount_keeps_decimal_precision() {
        let body = json!({ "amount": "84.03", "method": "cheque", "reference": "CHK-001" });
        let (status, bytes) = post_raw("/payments", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"84.03");
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_json() {
        let (status, bytes) = post_raw("/payments", "{ amount: 10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INVALID_JSON");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn broken_field_rules_are_listed() {
        let body = json!({ "client_id": 3, "shipment_ids": [], "due_in_days": 5000 });
        let (status, bytes) = post_raw("/invoices", &body.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("due_in_days: range"), "{}", message);
        assert!(
            message.contains("shipment_ids: at least one shipment is required"),
            "{}",
            message
        );
    }

    #[tokio::test]
    async fn oversized_payment_reference_is_rejected() {
        let body = json!({ "amount": "10", "reference": "R".repeat(129) });
        let (status, _) = post_raw("/payments", &body.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
