pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use config::Config;
use services::razorpay::RazorpayClient;
use store::PaymentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub razorpay: Arc<RazorpayClient>,
    pub payments: Arc<dyn PaymentStore>,
}

impl AppState {
    pub fn new(config: Config, razorpay: RazorpayClient, payments: Arc<dyn PaymentStore>) -> Self {
        Self {
            config: Arc::new(config),
            razorpay: Arc::new(razorpay),
            payments,
        }
    }
}
