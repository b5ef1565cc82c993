//! Payment REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{PaymentReceiptResponse, PaymentResponse, RecordPaymentRequest};
use crate::application::services::RecordPayment;
use crate::domain::payment::PaymentMethod;
use crate::interfaces::http::common::{
    bad_request, error_response, ApiError, ApiResponse, ApiResult, ValidatedJson,
};
use crate::interfaces::http::modules::invoices::InvoiceResponse;
use crate::interfaces::http::ApiState;

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}/payments",
    tag = "Payments",
    params(("id" = i32, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Payments on the invoice", body = ApiResponse<Vec<PaymentResponse>>),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn list_payments(
    State(state): State<ApiState>,
    Path(invoice_id): Path<i32>,
) -> ApiResult<Vec<PaymentResponse>> {
    let payments = state
        .services
        .payments
        .list_payments(invoice_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        payments.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/payments",
    tag = "Payments",
    params(("id" = i32, Path, description = "Invoice ID")),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<PaymentReceiptResponse>),
        (status = 400, description = "Invalid amount or method"),
        (status = 404, description = "Invoice not found"),
        (status = 409, description = "Overpayment, or invoice paid or cancelled")
    )
)]
pub async fn record_payment(
    State(state): State<ApiState>,
    Path(invoice_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentReceiptResponse>>), ApiError> {
    let method = match req.method.as_deref() {
        Some(m) => PaymentMethod::from_str(&m.to_uppercase())
            .ok_or_else(|| bad_request(format!("Unknown payment method: {}", m)))?,
        None => PaymentMethod::Cash,
    };
    let receipt = state
        .services
        .payments
        .record_payment(RecordPayment {
            invoice_id,
            amount: req.amount,
            method,
            payment_date: req.payment_date,
            reference: req.reference,
            notes: req.notes,
        })
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PaymentReceiptResponse {
            payment: receipt.payment.into(),
            invoice: InvoiceResponse::new(receipt.invoice, &state.currency),
        })),
    ))
}

/// Reverse a payment. The row is removed; the ledger keeps the reversal.
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    tag = "Payments",
    params(("id" = i32, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment reversed; updated invoice", body = ApiResponse<InvoiceResponse>),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Invoice is cancelled")
    )
)]
pub async fn cancel_payment(
    State(state): State<ApiState>,
    Path(id): Path<i32>,
) -> ApiResult<InvoiceResponse> {
    let invoice = state
        .services
        .payments
        .cancel_payment(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(InvoiceResponse::new(
        invoice,
        &state.currency,
    ))))
}
