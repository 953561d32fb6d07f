//! Classifier Module - fraud model inference
//!
//! The trait is the seam between the prediction service and the model
//! implementation, so the boosted ensemble can be swapped out.

pub mod tree;
pub mod ensemble;

use thiserror::Error;

// Re-export common types
pub use ensemble::{GradientBoostedTrees, ModelError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Feature vector has {actual} columns, model expects {expected}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Model returned an invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("Model error: {0}")]
    Model(String),
}

/// Binary fraud classifier
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Width of the feature vector the model was trained on
    fn num_features(&self) -> usize;

    /// Content hash of the loaded artifact
    fn fingerprint(&self) -> &str;

    /// Probability of the fraud class
    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError>;
}

/// Fixed-output classifier for tests
#[cfg(test)]
pub(crate) struct FixedClassifier {
    pub probability: f64,
    pub num_features: usize,
}

#[cfg(test)]
impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn fingerprint(&self) -> &str {
        "0000"
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.num_features {
            return Err(InferenceError::FeatureCount {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        Ok(self.probability)
    }
}
