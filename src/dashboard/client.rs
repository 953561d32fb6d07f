//! HTTP client for the scoring API

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::DashboardError;

/// Prediction as shown to the dashboard user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreReport {
    pub prediction: u8,
    #[serde(rename = "probabilite_fraude")]
    pub probability: f64,
    pub interpretation: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    resultats: T,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    erreur: String,
}

/// One request per call; failures surface immediately, no retry
pub struct ScoringClient {
    http: reqwest::Client,
    predict_url: String,
    batch_url: String,
}

impl ScoringClient {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            http: reqwest::Client::new(),
            predict_url: format!("{}/predire", base),
            batch_url: format!("{}/predire/lot", base),
        }
    }

    /// Score one transaction. A payload with `null` values is sent as a batch of one
    /// so the server imputes the gaps; `/predire` only takes complete records.
    pub async fn predict(&self, payload: &Value) -> Result<ScoreReport, DashboardError> {
        if !has_gaps(payload) {
            let envelope: Envelope<ScoreReport> = self.post(&self.predict_url, payload).await?;
            return Ok(envelope.resultats);
        }

        let body = json!({ "transactions": [payload] });
        let envelope: Envelope<Vec<ScoreReport>> = self.post(&self.batch_url, &body).await?;
        envelope
            .resultats
            .into_iter()
            .next()
            .ok_or(DashboardError::EmptyResponse)
    }

    async fn post<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T, DashboardError> {
        tracing::debug!(url = %url, "Requesting prediction");

        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .map(|body| body.erreur);
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

fn has_gaps(payload: &Value) -> bool {
    payload
        .as_object()
        .map_or(false, |object| object.values().any(Value::is_null))
}
