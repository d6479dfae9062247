use serde::{Deserialize, Serialize};

/// Razorpay webhook envelope. Only the fields the reconciler needs are typed;
/// everything else in the delivery passes through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookEntities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntities {
    #[serde(default)]
    pub payment: Option<PaymentWrapper>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWrapper {
    pub entity: PaymentEntity,
}

/// Payment entity nested inside a `payment.*` webhook. Serialized verbatim
/// into the status record's details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}
