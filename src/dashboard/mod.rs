//! Dashboard client - looks up sample transactions and scores them through the API

pub mod dataset;
pub mod client;

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

pub use client::{ScoreReport, ScoringClient};
pub use dataset::{SampleDataset, SampleTransaction};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erreur de connexion : {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Erreur API: {status}{}", .message.as_ref().map(|m| format!(" ({})", m)).unwrap_or_default())]
    Api { status: u16, message: Option<String> },

    #[error("Réponse vide de l'API")]
    EmptyResponse,

    #[error("Heure invalide '{0}', format attendu HH:MM ou HH:MM:SS")]
    InvalidTime(String),
}

/// Parse a wall-clock time into minutes since midnight
pub fn minutes_since_midnight(input: &str) -> Result<f64, DashboardError> {
    let input = input.trim();
    let time = NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| DashboardError::InvalidTime(input.to_string()))?;

    Ok(time.num_seconds_from_midnight() as f64 / 60.0)
}

/// Fraud probability as a percentage with two decimals
pub fn format_probability(probability: f64) -> String {
    format!("{:.2} %", probability * 100.0)
}
