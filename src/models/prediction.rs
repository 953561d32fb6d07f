//! Prediction model and response bodies

use serde::{Serialize, Serializer};

/// Classifier output class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FraudLabel {
    Normal,
    Fraudulent,
}

impl FraudLabel {
    /// Class index as returned by the classifier
    pub const fn class(self) -> u8 {
        match self {
            FraudLabel::Normal => 0,
            FraudLabel::Fraudulent => 1,
        }
    }

    /// Label for a fraud-class probability; strictly above `threshold` is fraudulent
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability > threshold {
            FraudLabel::Fraudulent
        } else {
            FraudLabel::Normal
        }
    }

    /// Human-readable text shown to API callers
    pub const fn interpretation(self) -> &'static str {
        match self {
            FraudLabel::Normal => "Transaction Normale",
            FraudLabel::Fraudulent => "Transaction Frauduleuse",
        }
    }
}

impl Serialize for FraudLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.class())
    }
}

/// Output of one prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub label: FraudLabel,
    /// Probability of the fraud class, in [0, 1]
    pub probability: f64,
}

impl PredictionResult {
    pub fn interpretation(&self) -> &'static str {
        self.label.interpretation()
    }
}

/// A submitted record echoed back with its prediction
#[derive(Debug, Clone, Serialize)]
pub struct ScoredTransaction<T: Serialize> {
    #[serde(flatten)]
    pub record: T,
    pub prediction: FraudLabel,
    pub probabilite_fraude: f64,
    pub interpretation: &'static str,
}

impl<T: Serialize> ScoredTransaction<T> {
    pub fn new(record: T, result: PredictionResult) -> Self {
        Self {
            record,
            prediction: result.label,
            probabilite_fraude: result.probability,
            interpretation: result.interpretation(),
        }
    }
}

/// `{"resultats": ...}` envelope
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse<T: Serialize> {
    pub resultats: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretation_follows_label() {
        for label in [FraudLabel::Normal, FraudLabel::Fraudulent] {
            let result = PredictionResult { label, probability: 0.5 };
            let fraudulent = result.interpretation() == "Transaction Frauduleuse";
            assert_eq!(label.class() == 1, fraudulent);
            if !fraudulent {
                assert_eq!(result.interpretation(), "Transaction Normale");
            }
        }
    }

    #[test]
    fn test_threshold_boundary() {
        // An exact tie stays normal
        assert_eq!(FraudLabel::from_probability(0.5, 0.5), FraudLabel::Normal);
        assert_eq!(FraudLabel::from_probability(0.4999, 0.5), FraudLabel::Normal);
        assert_eq!(FraudLabel::from_probability(0.5001, 0.5), FraudLabel::Fraudulent);
        assert_eq!(FraudLabel::from_probability(1.0, 1.0), FraudLabel::Normal);
    }

    #[test]
    fn test_scored_transaction_shape() {
        let record = serde_json::json!({ "User_ID": 7 });
        let scored = ScoredTransaction::new(
            record,
            PredictionResult { label: FraudLabel::Fraudulent, probability: 0.9 },
        );
        let value = serde_json::to_value(PredictionResponse { resultats: scored }).unwrap();

        assert_eq!(value["resultats"]["User_ID"], 7);
        assert_eq!(value["resultats"]["prediction"], 1);
        assert_eq!(value["resultats"]["probabilite_fraude"], 0.9);
        assert_eq!(value["resultats"]["interpretation"], "Transaction Frauduleuse");
    }
}
