//! Root handler

use axum::Json;
use serde::Serialize;

pub const WELCOME_MESSAGE: &str = "Bienvenue sur l’API de détection de fraude bancaire.";

#[derive(Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}
