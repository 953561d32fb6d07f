//! Gradient-boosted tree ensemble (binary logistic)
//!
//! Model file format:
//! ```json
//! {
//!   "version": 1,
//!   "num_features": 30,
//!   "base_margin": -2.5,
//!   "trees": [ { "nodes": [ { "id": 0, "feature": 1, "threshold": 10000.0, "left": 1, "right": 2 }, ... ] } ]
//! }
//! ```
//! Fraud probability = sigmoid(base_margin + Σ leaf values).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::tree::Tree;
use super::{Classifier, InferenceError};

/// Supported model format version
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnsembleFile {
    version: u32,
    num_features: usize,
    #[serde(default)]
    base_margin: f64,
    trees: Vec<Tree>,
}

/// Boosted ensemble loaded from disk, read-only after load
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    name: String,
    num_features: usize,
    base_margin: f64,
    trees: Vec<Tree>,
    fingerprint: String,
}

impl GradientBoostedTrees {
    /// Parse and validate a model from JSON text
    pub fn from_json_str(name: &str, content: &str) -> Result<Self, ModelError> {
        let file: EnsembleFile = serde_json::from_str(content)?;

        if file.version != MODEL_FORMAT_VERSION {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                file.version
            )));
        }
        if file.num_features == 0 {
            return Err(ModelError::ValidationFailed("num_features must be positive".to_string()));
        }
        if !file.base_margin.is_finite() {
            return Err(ModelError::ValidationFailed("base_margin must be finite".to_string()));
        }
        for (i, tree) in file.trees.iter().enumerate() {
            tree.validate(file.num_features).map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        let fingerprint = format!("{:x}", Sha256::digest(content.as_bytes()));

        Ok(Self {
            name: name.to_string(),
            num_features: file.num_features,
            base_margin: file.base_margin,
            trees: file.trees,
            fingerprint,
        })
    }

    /// Load a model file; the file stem becomes the model name
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");

        let model = Self::from_json_str(name, &content)?;

        tracing::info!(
            model = %model.name,
            path = %path.display(),
            trees = model.trees.len(),
            features = model.num_features,
            "Model loaded successfully"
        );

        Ok(model)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Raw log-odds before the sigmoid
    pub fn margin(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.num_features {
            return Err(InferenceError::FeatureCount {
                expected: self.num_features,
                actual: features.len(),
            });
        }

        self.trees.iter().enumerate().try_fold(self.base_margin, |sum, (i, tree)| {
            tree.evaluate(features)
                .map(|leaf| sum + leaf)
                .ok_or_else(|| InferenceError::Model(format!("tree {} could not be evaluated", i)))
        })
    }
}

impl Classifier for GradientBoostedTrees {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        Ok(sigmoid(self.margin(features)?))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
pub(crate) const TINY_MODEL: &str = r#"{
    "version": 1,
    "num_features": 2,
    "base_margin": -1.0,
    "trees": [
        { "nodes": [
            { "id": 0, "feature": 0, "threshold": 100.0, "left": 1, "right": 2 },
            { "id": 1, "leaf": -1.0 },
            { "id": 2, "leaf": 3.0 }
        ] },
        { "nodes": [
            { "id": 0, "feature": 1, "threshold": 0.5, "left": 1, "right": 2, "missing": 2 },
            { "id": 1, "leaf": 0.0 },
            { "id": 2, "leaf": 1.0 }
        ] }
    ]
}"#;
