// ============================================================
// PREDICTION SCORES
// ============================================================

use serde::{Deserialize, Serialize};

use super::RawRow;

/// Model output names, in the positional order of the model's 3-vector
pub const TARGET_NAMES: [&str; 3] = ["Disponibilité", "Process Safety", "Fiabilité Intégrité"];

/// Scores for one row. `criticality` is always the sum of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionScores {
    #[serde(rename = "Disponibilité")]
    pub availability: f64,
    #[serde(rename = "Process Safety")]
    pub process_safety: f64,
    #[serde(rename = "Fiabilité Intégrité")]
    pub reliability_integrity: f64,
    #[serde(rename = "Criticité")]
    pub criticality: f64,
}

impl PredictionScores {
    pub fn new(availability: f64, process_safety: f64, reliability_integrity: f64) -> Self {
        Self {
            availability,
            process_safety,
            reliability_integrity,
            criticality: availability + process_safety + reliability_integrity,
        }
    }
}

/// One scored row of a batch
#[derive(Debug, Clone, Serialize)]
pub struct RowResult {
    pub original_data: RawRow,
    pub predictions: PredictionScores,
}
