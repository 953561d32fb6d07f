//! Prediction handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};
use serde_json::Value;

use crate::{AppState, AppError, AppResult};
use crate::models::{
    PartialTransaction, PredictionResponse, ScoredTransaction, TransactionRecord, ValidationError,
};

/// Score a single transaction
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResponse<ScoredTransaction<TransactionRecord>>>> {
    let body = require_body(payload)?;

    let record = TransactionRecord::from_json(body)?;
    let result = state.service.predict(&record)?;

    tracing::info!(
        user_id = record.user_id,
        prediction = result.label.class(),
        probability = result.probability,
        "Transaction scored"
    );

    Ok(Json(PredictionResponse {
        resultats: ScoredTransaction::new(record, result),
    }))
}

/// Score a batch of transactions; null values are imputed over the batch
pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResponse<Vec<ScoredTransaction<PartialTransaction>>>>> {
    let body = require_body(payload)?;

    let items = match body {
        Value::Object(mut object) => match object.remove("transactions") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ValidationError::new("transactions", "tableau attendu").into()),
            None => return Err(ValidationError::new("transactions", "champ requis manquant").into()),
        },
        _ => return Err(ValidationError::new("body", "objet JSON attendu").into()),
    };

    if items.is_empty() {
        return Err(AppError::InvalidRequest("Le lot de transactions est vide".to_string()));
    }
    if items.len() > state.config.max_batch_size {
        return Err(AppError::InvalidRequest(format!(
            "Le lot dépasse la taille maximale de {} transactions",
            state.config.max_batch_size
        )));
    }

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            PartialTransaction::from_json(item).map_err(|e| e.within(&format!("transactions[{}]", i)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Scoring is CPU-bound; keep it off the async workers
    let service = state.service.clone();
    let (rows, results) = tokio::task::spawn_blocking(move || {
        let results = service.predict_batch(&rows);
        (rows, results)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Batch scoring task failed: {}", e)))?;
    let results = results?;

    tracing::info!(count = rows.len(), "Batch scored");

    Ok(Json(PredictionResponse {
        resultats: rows
            .into_iter()
            .zip(results)
            .map(|(row, result)| ScoredTransaction::new(row, result))
            .collect(),
    }))
}

fn require_body(payload: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    let Json(body) = payload?;
    if body.is_null() {
        return Err(AppError::MissingBody);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use crate::{create_router, AppState};
    use crate::config::Config;
    use crate::models::transaction::sample_json;
    use crate::service::fixed_service;

    use axum::{body::Body, http::{header, Request, StatusCode}, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(probability: f64) -> Router {
        create_router(AppState {
            service: Arc::new(fixed_service(probability)),
            config: Config {
                max_batch_size: 3,
                ..Config::default()
            },
        })
    }

    async fn post(app: Router, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let builder = Request::builder().method("POST").uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_well_formed_record() {
        let (status, body) = post(app(0.12), "/predire", Some(sample_json().to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let resultats = &body["resultats"];
        assert_eq!(resultats["prediction"], 0);
        assert_eq!(resultats["probabilite_fraude"], 0.12);
        assert_eq!(resultats["interpretation"], "Transaction Normale");
        assert_eq!(resultats["User_ID"], 1);
        assert_eq!(resultats["Location"], "Abidjan");
        assert_eq!(resultats.as_object().unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_fraudulent_record() {
        let (status, body) = post(app(0.93), "/predire", Some(sample_json().to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resultats"]["prediction"], 1);
        assert_eq!(body["resultats"]["interpretation"], "Transaction Frauduleuse");
    }

    #[tokio::test]
    async fn test_probability_at_threshold_is_normal() {
        let (status, body) = post(app(0.5), "/predire", Some(sample_json().to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resultats"]["prediction"], 0);
        assert_eq!(body["resultats"]["probabilite_fraude"], 0.5);
        assert_eq!(body["resultats"]["interpretation"], "Transaction Normale");
    }

    #[tokio::test]
    async fn test_whole_float_accepted_for_integer_field() {
        let mut record = sample_json();
        record["Account_Age"] = serde_json::json!(12.0);
        let (status, body) = post(app(0.1), "/predire", Some(record.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resultats"]["Account_Age"], 12);
    }

    #[tokio::test]
    async fn test_empty_object_names_first_missing_field() {
        let (status, body) = post(app(0.1), "/predire", Some("{}".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["erreur"].as_str().unwrap().contains("User_ID"));
    }

    #[tokio::test]
    async fn test_missing_field_never_reaches_classifier() {
        // An out-of-range probability would surface as 500 if the model ran
        let mut record = sample_json();
        record.as_object_mut().unwrap().remove("Account_Age");

        let (status, body) = post(app(2.0), "/predire", Some(record.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["erreur"].as_str().unwrap().contains("Account_Age"));
    }

    #[tokio::test]
    async fn test_unseen_payment_method_is_accepted() {
        let mut record = sample_json();
        record["Payment_Method"] = json!("crypto");

        let (status, body) = post(app(0.3), "/predire", Some(record.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resultats"]["Payment_Method"], "crypto");
    }

    #[tokio::test]
    async fn test_missing_body() {
        let (status, body) = post(app(0.1), "/predire", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["erreur"], "Aucune donnée JSON reçue");

        let (status, body) = post(app(0.1), "/predire", Some("null".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["erreur"], "Aucune donnée JSON reçue");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = post(app(0.1), "/predire", Some("{\"User_ID\":".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["erreur"].is_string());
    }

    #[tokio::test]
    async fn test_inference_failure_is_500() {
        let (status, body) = post(app(f64::NAN), "/predire", Some(sample_json().to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["erreur"].is_string());
    }

    #[tokio::test]
    async fn test_service_survives_failed_request() {
        let app = app(0.2);
        let (status, _) = post(app.clone(), "/predire", Some("{}".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(app, "/predire", Some(sample_json().to_string())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_batch_with_nulls() {
        let mut partial = sample_json();
        partial["Transaction_Amount"] = Value::Null;
        partial["Device_Used"] = Value::Null;
        let body = json!({ "transactions": [sample_json(), partial] });

        let (status, body) = post(app(0.7), "/predire/lot", Some(body.to_string())).await;
        assert_eq!(status, StatusCode::OK);

        let resultats = body["resultats"].as_array().unwrap();
        assert_eq!(resultats.len(), 2);
        assert_eq!(resultats[1]["Transaction_Amount"], Value::Null);
        assert_eq!(resultats[1]["prediction"], 1);
    }

    #[tokio::test]
    async fn test_batch_errors() {
        let (status, body) = post(app(0.1), "/predire/lot", Some(json!({ "transactions": [] }).to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["erreur"].as_str().unwrap().contains("vide"));

        let too_many = json!({ "transactions": vec![sample_json(); 4] });
        let (status, _) = post(app(0.1), "/predire/lot", Some(too_many.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(app(0.1), "/predire/lot", Some("{}".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["erreur"].as_str().unwrap().contains("transactions"));

        let mut broken = sample_json();
        broken.as_object_mut().unwrap().remove("Location");
        let batch = json!({ "transactions": [sample_json(), broken] });
        let (status, body) = post(app(0.1), "/predire/lot", Some(batch.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["erreur"].as_str().unwrap().starts_with("transactions[1].Location"));
    }
}
