//! Upload entry points: preview a decoded file, or score every row of it.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::domain::error::Result;
use crate::domain::work_order::{RawRow, RowResult, REQUIRED_COLUMNS};
use crate::infrastructure::nlp::LinguisticResources;
use crate::infrastructure::predictors::RiskPredictor;
use crate::infrastructure::tabular::decode_upload;

use super::batch_pipeline::BatchPipeline;
use super::column_normalizer::normalize_column_name;

#[derive(Debug, Serialize)]
pub struct FilePreview {
    pub filename: String,
    pub data: Vec<RawRow>,
    /// rows x columns of the kept rows
    pub row_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ScoredUpload {
    pub filename: String,
    pub results: Vec<RowResult>,
}

pub struct UploadScoringUseCase {
    pipeline: BatchPipeline,
}

impl UploadScoringUseCase {
    pub fn new(resources: Arc<LinguisticResources>, predictor: Arc<dyn RiskPredictor>) -> Self {
        Self {
            pipeline: BatchPipeline::new(resources, predictor),
        }
    }

    /// Decode and drop incomplete rows. Headers are kept as uploaded.
    pub fn preview(&self, filename: &str, bytes: &[u8]) -> Result<FilePreview> {
        let dataset = decode_upload(filename, bytes)?.drop_incomplete_rows();
        let row_count = dataset.cell_count();
        info!(filename, rows = dataset.row_count(), columns = dataset.column_count(), "File previewed");

        Ok(FilePreview {
            filename: filename.to_string(),
            data: dataset.into_rows(),
            row_count,
        })
    }

    /// Decode, normalize headers and score every complete row.
    pub async fn score(&self, filename: &str, bytes: &[u8]) -> Result<ScoredUpload> {
        let request_id = Uuid::new_v4();
        let span = info_span!("predict", %request_id, filename);

        async move {
            let dataset = decode_upload(filename, bytes)?.rename_columns(normalize_column_name);
            info!(
                rows = dataset.row_count(),
                columns = dataset.column_count(),
                "Scoring upload"
            );

            let results = self.pipeline.run(dataset, &REQUIRED_COLUMNS).await?;
            info!(scored = results.len(), "Upload scored");

            Ok(ScoredUpload {
                filename: filename.to_string(),
                results,
            })
        }
        .instrument(span)
        .await
    }
}
