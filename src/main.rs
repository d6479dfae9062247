use std::{sync::Arc, time::Duration};

use razorpay_gateway::{
    api::create_router,
    api::middleware::init_tracing,
    config::Config,
    services::razorpay::RazorpayClient,
    store::{self, InMemoryPaymentStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    tracing::info!("Starting Razorpay gateway v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration; missing Razorpay secrets abort startup here rather
    // than failing every request later.
    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    tracing::info!("Configuration loaded successfully");

    // Initialize provider client
    let razorpay = RazorpayClient::new(&config.razorpay)?;

    // Initialize payment status store and its eviction sweep
    let payments = Arc::new(InMemoryPaymentStore::new(Duration::from_secs(
        config.retention.status_ttl_secs,
    )));
    store::spawn_sweeper(
        payments.clone(),
        Duration::from_secs(config.retention.sweep_interval_secs),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state and router
    let state = AppState::new(config, razorpay, payments);
    let app = create_router(state);

    tracing::info!("Server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Razorpay gateway is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
