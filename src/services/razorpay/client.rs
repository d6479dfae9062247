use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::RazorpayConfig;
use crate::error::{AppError, AppResult};

const RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Authenticated HTTP client for the Razorpay REST API. Constructed once at
/// startup and injected into handlers via the application state.
#[derive(Clone)]
pub struct RazorpayClient {
    http_client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> AppResult<Self> {
        Self::with_base_url(config, RAZORPAY_API_URL)
    }

    /// Build a client against a non-default API base URL. Used by tests to
    /// point at a mock server.
    pub fn with_base_url(config: &RazorpayConfig, base_url: &str) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }

    pub(super) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(map_transport_error)?;

        self.handle_response(response).await
    }

    pub(super) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                tracing::error!("Failed to parse Razorpay response: {} - Body: {}", e, body);
                AppError::Razorpay(format!("Failed to parse response: {}", e))
            })
        } else {
            tracing::error!("Razorpay API error: {} - {}", status, body);

            let error_msg = match status {
                StatusCode::BAD_REQUEST => {
                    if let Ok(error) = serde_json::from_str::<RazorpayError>(&body) {
                        error.error.description
                    } else {
                        "Bad request".to_string()
                    }
                }
                StatusCode::UNAUTHORIZED => "Invalid API credentials".to_string(),
                StatusCode::NOT_FOUND => "Resource not found".to_string(),
                StatusCode::TOO_MANY_REQUESTS => "Rate limit exceeded".to_string(),
                _ => format!("API error: {}", status),
            };

            Err(AppError::Razorpay(error_msg))
        }
    }
}

/// Timeouts are surfaced as a distinct failure; they must never be read as
/// payment success or failure.
fn map_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::RazorpayTimeout
    } else {
        AppError::HttpClient(e)
    }
}

#[derive(Debug, serde::Deserialize)]
struct RazorpayError {
    error: RazorpayErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct RazorpayErrorDetail {
    #[allow(dead_code)]
    code: Option<String>,
    description: String,
}
