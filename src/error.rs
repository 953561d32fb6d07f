//! Error handling
//!
//! Every failure is returned as `{"erreur": <message>}`. Client mistakes map
//! to 400; failures inside encoding or inference map to 500.

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::classifier::InferenceError;
use crate::models::ValidationError;

pub type AppResult<T> = Result<T, AppError>;

pub const MISSING_BODY_MESSAGE: &str = "Aucune donnée JSON reçue";

#[derive(Debug)]
pub enum AppError {
    // Request errors
    MissingBody,
    MalformedJson(String),
    Validation(ValidationError),
    InvalidRequest(String),

    // Scoring errors
    Inference(InferenceError),

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingBody
            | AppError::MalformedJson(_)
            | AppError::Validation(_)
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Inference(_) | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::MissingBody => MISSING_BODY_MESSAGE.to_string(),
            AppError::MalformedJson(msg) => {
                tracing::debug!("Malformed JSON body: {}", msg);
                format!("JSON invalide: {}", msg)
            }
            AppError::Validation(err) => {
                tracing::debug!(field = %err.field, "Validation failed: {}", err.reason);
                err.to_string()
            }
            AppError::InvalidRequest(msg) => msg,
            AppError::Inference(err) => {
                tracing::error!("Inference error: {}", err);
                format!("Erreur lors de la prédiction: {}", err)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Erreur interne du serveur".to_string()
            }
        };

        (status, Json(json!({ "erreur": message }))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::Inference(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => AppError::MissingBody,
            other => AppError::MalformedJson(other.body_text()),
        }
    }
}
