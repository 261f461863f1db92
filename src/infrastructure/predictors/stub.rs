//! Scripted predictor for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::RiskPredictor;
use crate::domain::error::Result;
use crate::domain::work_order::FeatureFrame;

type Script = Box<dyn Fn(&FeatureFrame) -> Result<Vec<f64>> + Send + Sync>;

pub struct StubPredictor {
    script: Script,
    calls: AtomicUsize,
}

impl StubPredictor {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&FeatureFrame) -> Result<Vec<f64>> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fixed(outputs: Vec<f64>) -> Self {
        Self::new(move |_| Ok(outputs.clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RiskPredictor for StubPredictor {
    async fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(frame)
    }

    fn describe(&self) -> String {
        "stub".to_string()
    }
}
