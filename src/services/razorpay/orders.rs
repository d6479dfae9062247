use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RazorpayClient;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
}

/// Provider order object, returned to the caller verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub entity: String,
    pub amount: i64,
    pub amount_paid: i64,
    pub amount_due: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    pub attempts: i32,
    pub created_at: i64,
}

impl RazorpayClient {
    /// Create an order with the provider. Amounts are in minor currency
    /// units and must be positive; invalid amounts are rejected before any
    /// network call. Failures are never retried here: a duplicate order
    /// risks a duplicate charge, so callers retry explicitly with a fresh
    /// receipt token.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> AppResult<RazorpayOrder> {
        if request.amount <= 0 {
            return Err(AppError::Validation(
                "Amount must be a positive integer in minor currency units".to_string(),
            ));
        }

        self.post("/orders", request).await
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<RazorpayOrder> {
        self.get(&format!("/orders/{}", order_id)).await
    }
}

/// Receipt token used when the caller does not supply one: current time plus
/// a random suffix to avoid collisions. Razorpay caps receipts at 40 chars.
pub fn generate_receipt() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("order_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}
