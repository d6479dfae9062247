use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{PaymentStatus, PaymentStatusRecord, WebhookPayload};
use crate::services::razorpay::SignatureVerifier;
use crate::AppState;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

/// Receive a Razorpay webhook and reconcile payment status.
///
/// The signature covers the exact bytes Razorpay transmitted, so the body is
/// consumed raw and verified before any JSON parsing. On verification failure
/// the body is discarded untrusted and unparsed.
pub async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Validation(format!("Missing {} header", SIGNATURE_HEADER))
        })?;

    SignatureVerifier::verify_webhook_signature(
        &body,
        signature,
        &state.config.razorpay.webhook_secret,
    )?;

    let webhook: WebhookPayload = serde_json::from_slice(&body)?;

    match webhook.event.as_str() {
        "payment.captured" => {
            reconcile(&state, &webhook, PaymentStatus::Success).await?;
        }
        "payment.authorized" => {
            // Authorized but not yet captured; the capture webhook will
            // overwrite this with the terminal status.
            reconcile(&state, &webhook, PaymentStatus::Pending).await?;
        }
        "payment.failed" => {
            reconcile(&state, &webhook, PaymentStatus::Failed).await?;
        }
        event => {
            // Unknown event types are accepted and ignored, so new provider
            // events do not start bouncing deliveries.
            tracing::info!(event = %event, "Ignoring unhandled webhook event");
        }
    }

    Ok(Json(WebhookResponse { status: "ok" }))
}

/// Upsert the status record for the payment entity named in the webhook.
/// Last write wins, so replayed deliveries are idempotent.
async fn reconcile(
    state: &AppState,
    webhook: &WebhookPayload,
    status: PaymentStatus,
) -> AppResult<()> {
    let Some(payment) = webhook.payload.payment.as_ref() else {
        tracing::warn!(
            event = %webhook.event,
            "Payment webhook carried no payment entity, ignoring"
        );
        return Ok(());
    };

    let entity = &payment.entity;
    let details = serde_json::to_value(entity)?;

    state
        .payments
        .upsert(
            &entity.id,
            PaymentStatusRecord::new(status, Some(details)),
        )
        .await;

    tracing::info!(
        payment_id = %entity.id,
        event = %webhook.event,
        status = ?status,
        "Payment status reconciled from webhook"
    );

    Ok(())
}
