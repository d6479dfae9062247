use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::PaymentStatus;
use crate::services::razorpay::SignatureVerifier;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, message = "razorpay_order_id is required"))]
    pub razorpay_order_id: String,
    #[validate(length(min = 1, message = "razorpay_payment_id is required"))]
    pub razorpay_payment_id: String,
    #[validate(length(min = 1, message = "razorpay_signature is required"))]
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub status: &'static str,
}

/// Verify a checkout payment signature. Advisory only: the webhook is the
/// source of truth for payment status, so this path never writes to the
/// status store.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> AppResult<Response> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let verified = SignatureVerifier::verify_payment_signature(
        &request.razorpay_order_id,
        &request.razorpay_payment_id,
        &request.razorpay_signature,
        &state.config.razorpay.key_secret,
    )?;

    if verified {
        tracing::info!(
            order_id = %request.razorpay_order_id,
            payment_id = %request.razorpay_payment_id,
            "Payment signature verified"
        );
        Ok(Json(VerifyPaymentResponse { status: "success" }).into_response())
    } else {
        tracing::warn!(
            order_id = %request.razorpay_order_id,
            payment_id = %request.razorpay_payment_id,
            "Payment signature verification failed"
        );
        Ok((
            StatusCode::BAD_REQUEST,
            Json(VerifyPaymentResponse { status: "failure" }),
        )
            .into_response())
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Look up the reconciled status of a payment. An unknown id is not an
/// error; it simply has not been reconciled yet and reads as pending.
pub async fn get_payment_status(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> AppResult<Json<PaymentStatusResponse>> {
    let response = match state.payments.get(&payment_id).await {
        Some(record) => PaymentStatusResponse {
            status: record.status,
            details: record.details,
        },
        None => PaymentStatusResponse {
            status: PaymentStatus::Pending,
            details: None,
        },
    };

    Ok(Json(response))
}
