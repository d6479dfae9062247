use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment state as reconciled from provider webhooks. A payment with no
/// record is implicitly `Pending`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusRecord {
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentStatusRecord {
    pub fn new(status: PaymentStatus, details: Option<serde_json::Value>) -> Self {
        Self {
            status,
            details,
            updated_at: Utc::now(),
        }
    }
}
