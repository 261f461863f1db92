// ============================================================
// PREDICTION AGGREGATOR
// ============================================================
// Model 3-vector -> named scores + composite criticality

use std::sync::Arc;

use crate::domain::error::{AppError, Result};
use crate::domain::work_order::{FeatureFrame, PredictionScores};
use crate::infrastructure::predictors::RiskPredictor;

#[derive(Clone)]
pub struct PredictionAggregator {
    predictor: Arc<dyn RiskPredictor>,
}

impl PredictionAggregator {
    pub fn new(predictor: Arc<dyn RiskPredictor>) -> Self {
        Self { predictor }
    }

    /// Score one row. Model errors propagate untouched.
    pub async fn predict(&self, features: &FeatureFrame) -> Result<PredictionScores> {
        let outputs = self.predictor.predict(features).await?;
        scores_from_outputs(&outputs)
    }
}

/// Positions 0, 1, 2 are availability, process safety, reliability-integrity
pub fn scores_from_outputs(outputs: &[f64]) -> Result<PredictionScores> {
    match outputs {
        [availability, process_safety, reliability_integrity] => Ok(PredictionScores::new(
            *availability,
            *process_safety,
            *reliability_integrity,
        )),
        _ => Err(AppError::InferenceError(format!(
            "Model returned {} outputs, expected 3",
            outputs.len()
        ))),
    }
}
