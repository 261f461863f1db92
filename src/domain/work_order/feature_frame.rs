// ============================================================
// FEATURE FRAME
// ============================================================
// The single-row input handed to a risk predictor

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::CellValue;

/// Ordered column -> value mapping for one row of model input
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFrame {
    columns: Vec<(String, CellValue)>,
}

impl FeatureFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A column that already exists is overwritten in place.
    pub fn insert(&mut self, name: impl Into<String>, value: CellValue) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&CellValue> {
        self.columns.iter().map(|(_, value)| value).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for FeatureFrame {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
