use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::razorpay::{generate_receipt, CreateOrderRequest, RazorpayOrder};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderApiRequest {
    #[validate(range(min = 1, message = "Amount must be a positive integer in minor units"))]
    pub amount: i64,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 40, message = "Receipt must be 1-40 characters"))]
    pub receipt: Option<String>,
}

/// Create an order with the provider and return its order object verbatim.
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderApiRequest>,
) -> AppResult<Json<RazorpayOrder>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid request: {}", e)))?;

    let receipt = request.receipt.clone().unwrap_or_else(generate_receipt);

    let order = state
        .razorpay
        .create_order(&CreateOrderRequest {
            amount: request.amount,
            currency: request.currency.to_uppercase(),
            receipt: Some(receipt),
        })
        .await?;

    tracing::info!(
        order_id = %order.id,
        amount = order.amount,
        currency = %order.currency,
        "Razorpay order created"
    );

    Ok(Json(order))
}
