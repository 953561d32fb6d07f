//! Prediction Service - owns the classifier and training schema
//!
//! Both are loaded once and shared read-only behind `Arc`; no request can
//! mutate them.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::classifier::{Classifier, GradientBoostedTrees, InferenceError, ModelError};
use crate::features::{self, FeatureVector, SchemaError, TrainingSchema};
use crate::models::{FraudLabel, PartialTransaction, PredictionResult, TransactionRecord};

/// Startup failures while loading model artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to load training schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to load model: {0}")]
    Model(#[from] ModelError),

    #[error("Model expects {model} features but training schema has {schema} columns")]
    WidthMismatch { model: usize, schema: usize },

    #[error("Decision threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}

pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
    schema: Arc<TrainingSchema>,
    threshold: f64,
}

impl PredictionService {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        schema: Arc<TrainingSchema>,
        threshold: f64,
    ) -> Result<Self, ArtifactError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ArtifactError::InvalidThreshold(threshold));
        }
        if classifier.num_features() != schema.len() {
            return Err(ArtifactError::WidthMismatch {
                model: classifier.num_features(),
                schema: schema.len(),
            });
        }

        Ok(Self {
            classifier,
            schema,
            threshold,
        })
    }

    /// Load the model file and the column list, and check they agree
    pub fn load<P: AsRef<Path>>(model_path: P, columns_path: P, threshold: f64) -> Result<Self, ArtifactError> {
        let schema = TrainingSchema::load_json(columns_path.as_ref())?;
        tracing::info!(
            path = %columns_path.as_ref().display(),
            columns = schema.len(),
            fingerprint = %schema.fingerprint(),
            "Training schema loaded"
        );

        let model = GradientBoostedTrees::load_json(model_path)?;

        Self::new(Arc::new(model), Arc::new(schema), threshold)
    }

    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score one fully specified transaction
    pub fn predict(&self, record: &TransactionRecord) -> Result<PredictionResult, InferenceError> {
        let vector = features::encode(record, &self.schema);
        self.score(&vector)
    }

    /// Score a batch; imputation statistics are taken over the whole batch
    pub fn predict_batch(&self, rows: &[PartialTransaction]) -> Result<Vec<PredictionResult>, InferenceError> {
        features::encode_batch(rows, &self.schema)
            .iter()
            .map(|vector| self.score(vector))
            .collect()
    }

    fn score(&self, vector: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let probability = self.classifier.predict_proba(vector.as_slice())?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InvalidProbability(probability));
        }

        let label = FraudLabel::from_probability(probability, self.threshold);
        tracing::debug!(probability, label = label.class(), model = %self.classifier.name(), "Transaction scored");

        Ok(PredictionResult { label, probability })
    }
}

#[cfg(test)]
pub(crate) fn fixed_service(probability: f64) -> PredictionService {
    use crate::classifier::FixedClassifier;

    let schema = TrainingSchema::new(vec![
        "User_ID".to_string(),
        "Transaction_Amount".to_string(),
        "Payment_Method_card".to_string(),
    ])
    .unwrap();

    PredictionService::new(
        Arc::new(FixedClassifier { probability, num_features: 3 }),
        Arc::new(schema),
        0.5,
    )
    .unwrap()
}
