use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppResult;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub razorpay: RazorpayConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
}

/// Retention policy for the payment status table. Records older than the TTL
/// are evicted by a background sweep so the table cannot grow without bound.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    pub status_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables. The Razorpay key id,
    /// key secret and webhook secret are required; a missing secret is a
    /// startup-fatal error, never a per-request one.
    pub fn from_env() -> AppResult<Self> {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("retention.status.ttl.secs", 86400)?
            .set_default("retention.sweep.interval.secs", 300)?
            .add_source(config::Environment::default().separator("_").try_parsing(true))
            .build()?;

        // Manual construction due to environment variable naming
        Ok(Config {
            server: ServerConfig {
                host: config
                    .get_string("server.host")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: config.get_int("server.port").unwrap_or(8080) as u16,
            },
            razorpay: RazorpayConfig {
                key_id: config.get_string("razorpay.key.id")?,
                key_secret: config.get_string("razorpay.key.secret")?,
                webhook_secret: config.get_string("razorpay.webhook.secret")?,
            },
            retention: RetentionConfig {
                status_ttl_secs: config.get_int("retention.status.ttl.secs").unwrap_or(86400)
                    as u64,
                sweep_interval_secs: config
                    .get_int("retention.sweep.interval.secs")
                    .unwrap_or(300) as u64,
            },
        })
    }
}

pub type SharedConfig = Arc<Config>;
