//! Local evaluator for a JSON-exported scoring pipeline.
//!
//! The artifact lists the feature columns the pipeline was fit on, the target
//! names in output order, and one additive scorer per target.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::RiskPredictor;
use crate::domain::error::{AppError, Result};
use crate::domain::work_order::{CellValue, FeatureFrame, TARGET_NAMES};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: String,
    pub feature_columns: Vec<String>,
    pub targets: Vec<String>,
    pub outputs: Vec<OutputScorer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputScorer {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub terms: Vec<FeatureTerm>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureTerm {
    /// `coefficient * (x - mean) / scale`
    Numeric {
        column: String,
        coefficient: f64,
        #[serde(default)]
        mean: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
    /// One weight per known category
    Categorical {
        column: String,
        weights: HashMap<String, f64>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    /// Sum of token weights over a cleaned text column
    BagOfWords {
        column: String,
        weights: HashMap<String, f64>,
        #[serde(default)]
        mean_pooling: bool,
    },
}

fn unit_scale() -> f64 {
    1.0
}

impl FeatureTerm {
    fn column(&self) -> &str {
        match self {
            FeatureTerm::Numeric { column, .. }
            | FeatureTerm::Categorical { column, .. }
            | FeatureTerm::BagOfWords { column, .. } => column,
        }
    }

    fn contribution(&self, frame: &FeatureFrame) -> Result<f64> {
        let value = frame.get(self.column()).ok_or_else(|| {
            AppError::InferenceError(format!("column '{}' is missing", self.column()))
        })?;

        match self {
            FeatureTerm::Numeric {
                column,
                coefficient,
                mean,
                scale,
            } => {
                let x = numeric_value(column, value)?;
                Ok(coefficient * (x - mean) / scale)
            }
            FeatureTerm::Categorical {
                column,
                weights,
                handle_unknown,
            } => {
                let category = value.render().unwrap_or_default();
                match (weights.get(&category), handle_unknown) {
                    (Some(weight), _) => Ok(*weight),
                    (None, HandleUnknown::Ignore) => Ok(0.0),
                    (None, HandleUnknown::Error) => Err(AppError::InferenceError(format!(
                        "Found unknown categories ['{}'] in column '{}' during transform",
                        category, column
                    ))),
                }
            }
            FeatureTerm::BagOfWords {
                weights,
                mean_pooling,
                ..
            } => {
                let text = value.render().unwrap_or_default();
                let tokens: Vec<&str> = text.split_whitespace().collect();
                let total: f64 = tokens
                    .iter()
                    .filter_map(|token| weights.get(*token))
                    .sum();
                if *mean_pooling && !tokens.is_empty() {
                    Ok(total / tokens.len() as f64)
                } else {
                    Ok(total)
                }
            }
        }
    }
}

fn numeric_value(column: &str, value: &CellValue) -> Result<f64> {
    if let Some(x) = value.as_f64() {
        return Ok(x);
    }
    match value {
        CellValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            AppError::InferenceError(format!(
                "could not convert string to float: '{}' (column '{}')",
                text, column
            ))
        }),
        _ => Err(AppError::InferenceError(format!(
            "missing numeric value in column '{}'",
            column
        ))),
    }
}

pub struct ArtifactPredictor {
    artifact: ModelArtifact,
    expected_columns: BTreeSet<String>,
}

impl ArtifactPredictor {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            AppError::ConfigError(format!(
                "Failed to read model artifact {}: {}",
                path.display(),
                err
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(content).map_err(|err| {
            AppError::ConfigError(format!("Failed to parse model artifact: {}", err))
        })?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        if artifact.targets != TARGET_NAMES {
            return Err(AppError::ConfigError(format!(
                "Model targets {:?} do not match expected output order {:?}",
                artifact.targets, TARGET_NAMES
            )));
        }
        if artifact.outputs.len() != artifact.targets.len() {
            return Err(AppError::ConfigError(format!(
                "Model declares {} targets but {} scorers",
                artifact.targets.len(),
                artifact.outputs.len()
            )));
        }

        let expected_columns: BTreeSet<String> =
            artifact.feature_columns.iter().cloned().collect();
        if expected_columns.len() != artifact.feature_columns.len() {
            return Err(AppError::ConfigError(
                "Model feature columns contain duplicates".to_string(),
            ));
        }

        for term in artifact.outputs.iter().flat_map(|output| &output.terms) {
            if !expected_columns.contains(term.column()) {
                return Err(AppError::ConfigError(format!(
                    "Model term uses column '{}' outside its feature columns",
                    term.column()
                )));
            }
        }

        Ok(Self {
            artifact,
            expected_columns,
        })
    }

    fn check_columns(&self, frame: &FeatureFrame) -> Result<()> {
        let present: BTreeSet<String> = frame
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let missing: Vec<&String> = self.expected_columns.difference(&present).collect();
        let unexpected: Vec<&String> = present.difference(&self.expected_columns).collect();

        if missing.is_empty() && unexpected.is_empty() {
            return Ok(());
        }

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(format!("columns are missing: {:?}", missing));
        }
        if !unexpected.is_empty() {
            problems.push(format!("unexpected columns: {:?}", unexpected));
        }
        Err(AppError::InferenceError(format!(
            "The feature names should match those that were passed during fit ({})",
            problems.join("; ")
        )))
    }
}

#[async_trait]
impl RiskPredictor for ArtifactPredictor {
    async fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>> {
        self.check_columns(frame)?;

        self.artifact
            .outputs
            .iter()
            .map(|output| {
                output
                    .terms
                    .iter()
                    .try_fold(output.intercept, |acc, term| {
                        Ok::<f64, AppError>(acc + term.contribution(frame)?)
                    })
            })
            .collect()
    }

    fn describe(&self) -> String {
        let name = if self.artifact.name.is_empty() {
            "unnamed"
        } else {
            self.artifact.name.as_str()
        };
        format!(
            "artifact '{}' ({} feature columns)",
            name,
            self.expected_columns.len()
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small artifact fit on the four-column upload layout
    pub(crate) const SAMPLE_ARTIFACT: &str = r#"{
        "name": "sample",
        "feature_columns": [
            "systeme",
            "clean_description",
            "clean_description_equipment",
            "clean_section_proprietaire"
        ],
        "targets": ["Disponibilité", "Process Safety", "Fiabilité Intégrité"],
        "outputs": [
            {
                "intercept": 1.0,
                "terms": [
                    {"kind": "categorical", "column": "systeme", "weights": {"HVAC": 0.5, "Electrique": 1.0}},
                    {"kind": "bag_of_words", "column": "clean_description", "weights": {"fuite": 1.0}}
                ]
            },
            {
                "intercept": 0.5,
                "terms": [
                    {"kind": "bag_of_words", "column": "clean_description", "weights": {"dhuile": 2.0}}
                ]
            },
            {
                "intercept": 2.0,
                "terms": [
                    {"kind": "bag_of_words", "column": "clean_description_equipment", "weights": {"pompe": 0.25}},
                    {"kind": "bag_of_words", "column": "clean_section_proprietaire", "weights": {"maintenance": 0.25}}
                ]
            }
        ]
    }"#;

    fn frame(systeme: &str, description: &str) -> FeatureFrame {
        let mut frame = FeatureFrame::new();
        frame.insert("systeme", CellValue::from(systeme));
        frame.insert("clean_description", CellValue::from(description));
        frame.insert("clean_description_equipment", CellValue::from("pompe"));
        frame.insert("clean_section_proprietaire", CellValue::from("maintenance"));
        frame
    }

    #[tokio::test]
    async fn test_scores_sample_row() {
        let predictor = ArtifactPredictor::from_json(SAMPLE_ARTIFACT).unwrap();
        let outputs = predictor.predict(&frame("HVAC", "fuite dhuile")).await.unwrap();
        assert_eq!(outputs, vec![2.5, 2.5, 2.5]);
    }

    #[tokio::test]
    async fn test_column_order_does_not_matter() {
        let predictor = ArtifactPredictor::from_json(SAMPLE_ARTIFACT).unwrap();
        let mut reordered = FeatureFrame::new();
        reordered.insert("clean_section_proprietaire", CellValue::from("maintenance"));
        reordered.insert("clean_description_equipment", CellValue::from("pompe"));
        reordered.insert("clean_description", CellValue::from("fuite dhuile"));
        reordered.insert("systeme", CellValue::from("HVAC"));

        let outputs = predictor.predict(&reordered).await.unwrap();
        assert_eq!(outputs, vec![2.5, 2.5, 2.5]);
    }

    #[tokio::test]
    async fn test_unseen_category_is_inference_error() {
        let predictor = ArtifactPredictor::from_json(SAMPLE_ARTIFACT).unwrap();
        let err = predictor.predict(&frame("Hydraulique", "fuite")).await.unwrap_err();
        match err {
            AppError::InferenceError(msg) => assert!(msg.contains("Hydraulique")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extra_column_is_inference_error() {
        let predictor = ArtifactPredictor::from_json(SAMPLE_ARTIFACT).unwrap();
        let mut with_extra = frame("HVAC", "fuite");
        with_extra.insert("num_equipement", CellValue::Integer(7));
        let err = predictor.predict(&with_extra).await.unwrap_err();
        match err {
            AppError::InferenceError(msg) => assert!(msg.contains("num_equipement")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_numeric_term_rejects_text() {
        let artifact = r#"{
            "feature_columns": ["age"],
            "targets": ["Disponibilité", "Process Safety", "Fiabilité Intégrité"],
            "outputs": [
                {"terms": [{"kind": "numeric", "column": "age", "coefficient": 2.0, "mean": 1.0}]},
                {"intercept": 1.0},
                {"intercept": 1.0}
            ]
        }"#;
        let predictor = ArtifactPredictor::from_json(artifact).unwrap();

        let mut numeric = FeatureFrame::new();
        numeric.insert("age", CellValue::Integer(4));
        assert_eq!(predictor.predict(&numeric).await.unwrap(), vec![6.0, 1.0, 1.0]);

        let mut textual = FeatureFrame::new();
        textual.insert("age", CellValue::from("vieux"));
        assert!(predictor.predict(&textual).await.is_err());
    }

    #[test]
    fn test_wrong_target_order_rejected() {
        let artifact = SAMPLE_ARTIFACT.replace(
            r#"["Disponibilité", "Process Safety", "Fiabilité Intégrité"]"#,
            r#"["Process Safety", "Disponibilité", "Fiabilité Intégrité"]"#,
        );
        assert!(matches!(
            ArtifactPredictor::from_json(&artifact),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_term_outside_feature_columns_rejected() {
        let artifact = SAMPLE_ARTIFACT.replace(r#""column": "systeme""#, r#""column": "zone""#);
        assert!(ArtifactPredictor::from_json(&artifact).is_err());
    }
}
