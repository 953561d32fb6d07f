//! Fraud Scoring API server
//!
//! Loads the classifier and its training schema once, then serves
//! `POST /predire` until stopped.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fraud_scoring::{config::Config, create_router, AppState, PredictionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fraud_scoring=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Fraud Scoring API starting...");
    tracing::info!(
        model = %config.model_path.display(),
        columns = %config.model_columns_path.display(),
        threshold = config.decision_threshold,
        "Loading model artifacts"
    );

    let service = PredictionService::load(
        &config.model_path,
        &config.model_columns_path,
        config.decision_threshold,
    )
    .context("Failed to load model artifacts")?;

    tracing::info!(
        model = %service.classifier().name(),
        fingerprint = %service.classifier().fingerprint(),
        features = service.schema().len(),
        "Prediction service ready"
    );

    // Build application state
    let state = AppState {
        service: Arc::new(service),
        config: config.clone(),
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
