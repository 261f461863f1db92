// ============================================================
// WORK ORDER DOMAIN LAYER
// ============================================================
// Core types for uploaded work-order tables and their scores
// No I/O, no async

mod cell_value;
mod dataset;
mod feature_frame;
mod prediction;

pub use cell_value::CellValue;
pub use dataset::{Dataset, RawRow};
pub use feature_frame::FeatureFrame;
pub use prediction::{PredictionScores, RowResult, TARGET_NAMES};

/// Columns every `/predict` upload must carry once headers are normalized.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "description",
    "description_de_lequipement",
    "systeme",
    "section_proprietaire",
];
