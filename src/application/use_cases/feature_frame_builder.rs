// ============================================================
// FEATURE FRAME BUILDER
// ============================================================
// RawRow -> model input: free-text columns replaced by their
// cleaned counterparts, appended after the untouched columns

use crate::domain::work_order::{CellValue, FeatureFrame, RawRow};

use super::text_normalizer::TextNormalizer;

/// (raw column, cleaned column) pairs, in the order the cleaned columns are appended
pub const TEXT_FEATURES: [(&str, &str); 3] = [
    ("description", "clean_description"),
    ("description_de_lequipement", "clean_description_equipment"),
    ("section_proprietaire", "clean_section_proprietaire"),
];

pub struct FeatureFrameBuilder {
    normalizer: TextNormalizer,
}

impl FeatureFrameBuilder {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// Build the model input for one row.
    ///
    /// A raw text column absent from the row cleans to an empty string; the
    /// dataset-level column check runs before any row reaches this point.
    pub fn build(&self, row: &RawRow) -> FeatureFrame {
        let mut frame = FeatureFrame::new();

        for (name, value) in row.fields() {
            if !is_raw_text_column(name) {
                frame.insert(name.clone(), value.clone());
            }
        }

        for (raw, cleaned) in TEXT_FEATURES {
            let text = row
                .get(raw)
                .map(|value| self.normalizer.clean_cell(value))
                .unwrap_or_default();
            frame.insert(cleaned, CellValue::Text(text));
        }

        frame
    }
}

fn is_raw_text_column(name: &str) -> bool {
    TEXT_FEATURES.iter().any(|(raw, _)| *raw == name)
}
