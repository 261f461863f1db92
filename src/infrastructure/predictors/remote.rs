//! Client for a model served behind an HTTP inference endpoint.
//!
//! Request body is the frame in data-frame "split" form
//! (`{"columns": [...], "data": [[...]]}`); the service answers
//! `{"predictions": [[a, b, c]]}` or `{"error": "..."}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::RiskPredictor;
use crate::domain::error::{AppError, Result};
use crate::domain::work_order::{CellValue, FeatureFrame};

#[derive(Serialize)]
struct SplitFrame<'a> {
    columns: Vec<&'a str>,
    data: Vec<Vec<&'a CellValue>>,
}

#[derive(Deserialize)]
struct PredictionResponse {
    predictions: Vec<Vec<f64>>,
}

pub struct RemotePredictor {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl RemotePredictor {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = reqwest::Url::parse(endpoint).map_err(|err| {
            AppError::ConfigError(format!("Invalid inference endpoint '{}': {}", endpoint, err))
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::ConfigError(format!("Failed to build HTTP client: {}", err)))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl RiskPredictor for RemotePredictor {
    async fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        let body = SplitFrame {
            columns: frame.column_names(),
            data: vec![frame.values()],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::InferenceError(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::InferenceError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::InferenceError(format!(
                "Inference service error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AppError::InferenceError(format!("Failed to parse JSON: {}", e)))?;

        if let Some(error) = json.get("error").and_then(|value| value.as_str()) {
            return Err(AppError::InferenceError(error.to_string()));
        }

        let parsed: PredictionResponse = serde_json::from_value(json).map_err(|e| {
            AppError::InferenceError(format!("Invalid response format: {}", e))
        })?;

        parsed
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| AppError::InferenceError("Empty predictions array".to_string()))
    }

    fn describe(&self) -> String {
        format!("remote inference service at {}", self.endpoint)
    }
}
