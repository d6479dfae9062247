use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub razorpay: RazorpayHealth,
}

/// Secrets are reported only as presence booleans, never echoed.
#[derive(Serialize)]
pub struct RazorpayHealth {
    pub key_configured: bool,
    pub webhook_secret_configured: bool,
}

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        razorpay: RazorpayHealth {
            key_configured: !state.config.razorpay.key_id.is_empty()
                && !state.config.razorpay.key_secret.is_empty(),
            webhook_secret_configured: !state.config.razorpay.webhook_secret.is_empty(),
        },
    }))
}
