// ============================================================
// CELL VALUE
// ============================================================
// A single decoded table cell

use serde::{Deserialize, Serialize};

/// Markers read as a missing value, same set the usual data-frame readers use.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A decoded cell. Serializes to plain JSON (`null`, bool, number, string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Missing,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Whether a raw textual cell stands for a missing value. Exact match only:
    /// `"   "` and `" NA "` are ordinary text.
    pub fn is_na_marker(raw: &str) -> bool {
        NA_MARKERS.contains(&raw)
    }

    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Float(value) => value.is_nan(),
            _ => false,
        }
    }

    /// Text rendering of the cell, `None` when missing.
    ///
    /// Numbers render the way a Python `str()` would (`12`, `12.0`, `3.5`),
    /// booleans as `True` / `False`.
    pub fn render(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            CellValue::Missing => None,
            CellValue::Bool(true) => Some("True".to_string()),
            CellValue::Bool(false) => Some("False".to_string()),
            CellValue::Integer(value) => Some(value.to_string()),
            CellValue::Float(value) => {
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
                    Some(format!("{:.1}", value))
                } else {
                    Some(value.to_string())
                }
            }
            CellValue::Text(value) => Some(value.clone()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(value) => Some(*value as f64),
            CellValue::Float(value) if !value.is_nan() => Some(*value),
            CellValue::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}
