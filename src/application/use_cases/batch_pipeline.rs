// ============================================================
// BATCH PIPELINE
// ============================================================
// Dataset -> one RowResult per complete row, in input order.
// Fails fast: the first rejected row aborts the batch.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::work_order::{Dataset, RowResult};
use crate::infrastructure::nlp::LinguisticResources;
use crate::infrastructure::predictors::RiskPredictor;

use super::feature_frame_builder::FeatureFrameBuilder;
use super::prediction_aggregator::PredictionAggregator;
use super::text_normalizer::TextNormalizer;

pub struct BatchPipeline {
    builder: FeatureFrameBuilder,
    aggregator: PredictionAggregator,
}

impl BatchPipeline {
    pub fn new(resources: Arc<LinguisticResources>, predictor: Arc<dyn RiskPredictor>) -> Self {
        Self {
            builder: FeatureFrameBuilder::new(TextNormalizer::new(resources)),
            aggregator: PredictionAggregator::new(predictor),
        }
    }

    /// Score every complete row of a header-normalized dataset.
    ///
    /// Returns `SchemaError` before touching any row when a required column
    /// is absent. Rows holding a missing cell are dropped first.
    pub async fn run(&self, dataset: Dataset, required_columns: &[&str]) -> Result<Vec<RowResult>> {
        let missing = dataset.missing_columns(required_columns);
        if !missing.is_empty() {
            return Err(AppError::SchemaError(missing));
        }

        let received = dataset.row_count();
        let dataset = dataset.drop_incomplete_rows();
        debug!(
            received,
            complete = dataset.row_count(),
            "Dropped rows with missing values"
        );

        let mut results = Vec::with_capacity(dataset.row_count());
        for (index, row) in dataset.into_rows().into_iter().enumerate() {
            let features = self.builder.build(&row);
            let predictions = self.aggregator.predict(&features).await.map_err(|err| {
                warn!(row = index, error = %err, "Row rejected by model, aborting batch");
                err
            })?;
            results.push(RowResult {
                original_data: row,
                predictions,
            });
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::work_order::{CellValue, REQUIRED_COLUMNS};
    use crate::infrastructure::predictors::stub::StubPredictor;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn dataset(rows: Vec<[CellValue; 4]>) -> Dataset {
        Dataset::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows.into_iter().map(|row| row.to_vec()).collect(),
        )
    }

    fn row(description: &str, systeme: CellValue) -> [CellValue; 4] {
        [text(description), text("Pompe 12"), systeme, text("Maintenance")]
    }

    /// First output = number of words in clean_description
    fn word_count_predictor() -> Arc<StubPredictor> {
        Arc::new(StubPredictor::new(|frame| {
            let words = frame
                .get("clean_description")
                .and_then(|value| value.render())
                .map(|text| text.split_whitespace().count())
                .unwrap_or(0);
            Ok(vec![words as f64, 1.0, 2.0])
        }))
    }

    fn pipeline(predictor: Arc<StubPredictor>) -> BatchPipeline {
        BatchPipeline::new(Arc::new(LinguisticResources::default()), predictor)
    }

    #[tokio::test]
    async fn test_rows_with_missing_values_dropped_order_kept() {
        let predictor = word_count_predictor();
        let data = dataset(vec![
            row("Fuite", text("HVAC")),
            row("Bruit anormal", CellValue::Missing),
            row("Vibration moteur ventilateur", text("HVAC")),
        ]);

        let results = pipeline(predictor.clone())
            .run(data, &REQUIRED_COLUMNS)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].original_data.get("description"), Some(&text("Fuite")));
        assert_eq!(
            results[1].original_data.get("description"),
            Some(&text("Vibration moteur ventilateur"))
        );
        assert_eq!(results[0].predictions.availability, 1.0);
        assert_eq!(results[1].predictions.availability, 3.0);
        assert_eq!(predictor.calls(), 2);
    }

    #[tokio::test]
    async fn test_original_data_is_uncleaned() {
        let data = dataset(vec![row("Fuite d'huile", text("HVAC"))]);
        let results = pipeline(word_count_predictor())
            .run(data, &REQUIRED_COLUMNS)
            .await
            .unwrap();

        let original = &results[0].original_data;
        assert_eq!(original.get("description"), Some(&text("Fuite d'huile")));
        assert_eq!(original.get("clean_description"), None);
        assert_eq!(results[0].predictions.criticality, 5.0);
    }

    #[tokio::test]
    async fn test_missing_required_column_fails_before_any_row() {
        let predictor = word_count_predictor();
        let data = Dataset::new(
            vec![
                "description".to_string(),
                "description_de_lequipement".to_string(),
                "section_proprietaire".to_string(),
            ],
            vec![vec![text("Fuite"), text("Pompe"), text("Maintenance")]],
        );

        let err = pipeline(predictor.clone())
            .run(data, &REQUIRED_COLUMNS)
            .await
            .unwrap_err();

        match err {
            AppError::SchemaError(missing) => assert_eq!(missing, vec!["systeme".to_string()]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(predictor.calls(), 0);
    }

    #[tokio::test]
    async fn test_first_model_failure_aborts_batch() {
        let predictor = Arc::new(StubPredictor::new(|frame| {
            if frame.get("systeme") == Some(&CellValue::Text("Inconnu".to_string())) {
                return Err(AppError::InferenceError("unknown category".to_string()));
            }
            Ok(vec![1.0, 1.0, 1.0])
        }));
        let data = dataset(vec![
            row("Fuite", text("HVAC")),
            row("Bruit", text("Inconnu")),
            row("Vibration", text("HVAC")),
        ]);

        let err = pipeline(predictor.clone())
            .run(data, &REQUIRED_COLUMNS)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InferenceError(_)));
        assert_eq!(predictor.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_dataset_yields_no_results() {
        let results = pipeline(word_count_predictor())
            .run(dataset(Vec::new()), &REQUIRED_COLUMNS)
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
