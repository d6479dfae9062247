use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Payment signature errors (synchronous verify path)
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    // Webhook errors
    #[error("Webhook verification failed: {0}")]
    WebhookVerification(String),

    // Upstream provider errors
    #[error("Razorpay error: {0}")]
    Razorpay(String),

    #[error("Razorpay request timed out")]
    RazorpayTimeout,

    // HTTP transport errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidSignature(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE", msg.clone())
            }
            // The expected signature value is never included in the response.
            AppError::WebhookVerification(msg) => {
                (StatusCode::UNAUTHORIZED, "WEBHOOK_VERIFICATION_FAILED", msg.clone())
            }
            AppError::Razorpay(msg) => (StatusCode::BAD_GATEWAY, "RAZORPAY_ERROR", msg.clone()),
            AppError::RazorpayTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "RAZORPAY_TIMEOUT",
                "Payment provider did not respond in time".to_string(),
            ),
            AppError::HttpClient(e) => {
                tracing::error!("HTTP client error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTERNAL_SERVICE_ERROR",
                    "Failed to communicate with payment provider".to_string(),
                )
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "SERIALIZATION_ERROR",
                    "Invalid request format".to_string(),
                )
            }
            AppError::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    "Server configuration error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
