//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Serialized classifier
    pub model_path: PathBuf,

    /// Ordered training-time column names
    pub model_columns_path: PathBuf,

    /// Probability at or above which a transaction is labelled fraudulent
    pub decision_threshold: f64,

    /// Maximum records accepted by the batch endpoint
    pub max_batch_size: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            model_path: PathBuf::from("artifacts/model.json"),
            model_columns_path: PathBuf::from("artifacts/model_columns.json"),
            decision_threshold: 0.5,
            max_batch_size: 1000,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            model_columns_path: env::var("MODEL_COLUMNS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_columns_path),

            decision_threshold: env::var("DECISION_THRESHOLD")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.decision_threshold),

            max_batch_size: env::var("MAX_BATCH_SIZE")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_batch_size),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
