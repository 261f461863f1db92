pub mod artifact;
pub mod remote;
#[cfg(test)]
pub mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use crate::domain::error::Result;
use crate::domain::work_order::FeatureFrame;
use artifact::ArtifactPredictor;
use remote::RemotePredictor;

/// A pre-trained multi-output scorer: one feature frame in, one output vector out
#[async_trait]
pub trait RiskPredictor: Send + Sync {
    async fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>>;

    /// Short human-readable label for logs
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    #[default]
    Artifact,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ModelConfig {
    #[serde(default)]
    pub backend: ModelBackend,
    pub artifact_path: PathBuf,
    pub endpoint: String,
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Artifact,
            artifact_path: PathBuf::from("models/xgb_multioutput_pipeline.json"),
            endpoint: "http://127.0.0.1:8500/predict".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Load the configured predictor once, at startup
pub fn load_predictor(config: &ModelConfig) -> Result<Arc<dyn RiskPredictor>> {
    match config.backend {
        ModelBackend::Artifact => Ok(Arc::new(ArtifactPredictor::from_path(&config.artifact_path)?)),
        ModelBackend::Remote => Ok(Arc::new(RemotePredictor::new(
            &config.endpoint,
            Duration::from_secs(config.timeout_secs),
        )?)),
    }
}
