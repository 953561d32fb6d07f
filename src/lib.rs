//! Fraud Scoring API
//!
//! Scores bank transactions with a pre-trained boosted-tree classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   POST /predire   ┌──────────────────────────────────────────┐
//! │ Dashboard  │ ────────────────▶ │  Handlers (Axum)                         │
//! │ (CLI)      │ ◀──────────────── │    │ validate                            │
//! └────────────┘   {"resultats"}   │    ▼                                     │
//!                                  │  PredictionService                       │
//!                                  │    │ encode ──▶ TrainingSchema (Arc)     │
//!                                  │    ▼                                     │
//!                                  │  Classifier (Arc, read-only)             │
//!                                  └──────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod features;
pub mod classifier;
pub mod service;
pub mod handlers;
pub mod dashboard;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};
pub use service::PredictionService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub config: config::Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home::welcome))
        .route("/health", get(handlers::health::check))
        .route("/predire", post(handlers::predict::predict))
        .route("/predire/lot", post(handlers::predict::predict_batch))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::service::fixed_service;

    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState {
            service: Arc::new(fixed_service(0.25)),
            config: Config::default(),
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], handlers::home::WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model"], "fixed");
        assert_eq!(body["feature_count"], 3);
        assert_eq!(body["decision_threshold"], 0.5);
    }

    #[tokio::test]
    async fn test_predict_requires_post() {
        let response = app()
            .oneshot(Request::builder().uri("/predire").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
