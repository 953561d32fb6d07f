//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model: String,
    model_fingerprint: String,
    feature_count: usize,
    schema_fingerprint: String,
    decision_threshold: f64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let classifier = state.service.classifier();
    let schema = state.service.schema();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model: classifier.name().to_string(),
        model_fingerprint: classifier.fingerprint().to_string(),
        feature_count: schema.len(),
        schema_fingerprint: schema.fingerprint().to_string(),
        decision_threshold: state.service.threshold(),
    })
}
