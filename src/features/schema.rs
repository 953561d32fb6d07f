//! Training Schema - the feature layout the classifier was fitted on
//!
//! **The column list is authoritative.** Every feature vector handed to the
//! classifier has exactly these columns, in exactly this order. It is loaded
//! once at startup and never modified.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Training schema has no columns")]
    Empty,

    #[error("Duplicate column in training schema: {0}")]
    DuplicateColumn(String),
}

/// Ordered training-time column names
#[derive(Debug, Clone)]
pub struct TrainingSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    fingerprint: String,
}

impl TrainingSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if positions.insert(name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }

        let fingerprint = compute_fingerprint(&columns);

        Ok(Self {
            columns,
            positions,
            fingerprint,
        })
    }

    /// Load from a JSON array of column names
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        let columns: Vec<String> = serde_json::from_str(&content)?;
        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of a column, if the classifier was trained on it
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// SHA-256 over the ordered column names, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn compute_fingerprint(columns: &[String]) -> String {
    let mut hasher = Sha256::new();
    for name in columns {
        hasher.update(name.as_bytes());
        hasher.update([0u8]); // Separator
    }
    format!("{:x}", hasher.finalize())
}
