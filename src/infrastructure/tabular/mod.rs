//! Upload decoding: CSV and XLSX bytes into a typed [`Dataset`].

pub mod csv_parser;
pub mod xlsx_reader;

use crate::domain::error::{AppError, Result};
use crate::domain::work_order::{CellValue, Dataset};

pub use csv_parser::{CsvParser, CsvTable};

/// Accepted upload formats, chosen by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Xlsx,
}

impl UploadFormat {
    pub fn from_filename(filename: &str) -> Result<Self> {
        if filename.ends_with(".xlsx") {
            Ok(Self::Xlsx)
        } else if filename.ends_with(".csv") {
            Ok(Self::Csv)
        } else {
            Err(AppError::UnsupportedFormat(filename.to_string()))
        }
    }
}

/// Decode an uploaded file into a dataset. Column types are inferred the same
/// way for both formats so downstream code sees identical values.
pub fn decode_upload(filename: &str, bytes: &[u8]) -> Result<Dataset> {
    let table = match UploadFormat::from_filename(filename)? {
        UploadFormat::Csv => CsvParser::parse_bytes(bytes)?,
        UploadFormat::Xlsx => xlsx_reader::read_first_sheet(bytes)?,
    };

    let CsvTable {
        headers,
        mut records,
    } = table;
    let width = records
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    for record in records.iter_mut() {
        record.resize(width, CellValue::Missing);
    }
    for column in 0..width {
        coerce_column(&mut records, column);
    }

    tracing::debug!(
        "Decoded {} with {} rows and {} columns",
        filename,
        records.len(),
        width
    );
    Ok(Dataset::new(headers, records))
}

/// Unify a column: integers (floats if any cell is missing), then floats,
/// then booleans. Anything else stays as read.
fn coerce_column(records: &mut [Vec<CellValue>], column: usize) {
    let cells: Vec<&CellValue> = records
        .iter()
        .map(|r| &r[column])
        .filter(|c| !c.is_missing())
        .collect();
    if cells.is_empty() {
        return;
    }
    let has_missing = cells.len() < records.len();

    let target: Option<fn(&CellValue) -> Option<CellValue>> =
        if cells.iter().all(|c| as_integer(c).is_some()) {
            if has_missing {
                Some(|c| as_integer(c).map(|i| CellValue::Float(i as f64)))
            } else {
                Some(|c| as_integer(c).map(CellValue::Integer))
            }
        } else if cells.iter().all(|c| as_float(c).is_some()) {
            Some(|c| as_float(c).map(CellValue::Float))
        } else if cells.iter().all(|c| as_bool(c).is_some()) {
            Some(|c| as_bool(c).map(CellValue::Bool))
        } else {
            None
        };

    if let Some(convert) = target {
        for record in records.iter_mut() {
            if let Some(value) = convert(&record[column]) {
                record[column] = value;
            }
        }
    }
}

fn as_integer(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Integer(i) => Some(*i),
        CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            Some(*f as i64)
        }
        CellValue::Text(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_float(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Integer(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::Text(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_bool(cell: &CellValue) -> Option<bool> {
    match cell {
        CellValue::Bool(b) => Some(*b),
        CellValue::Text(s) => match s.as_str() {
            "True" | "TRUE" | "true" => Some(true),
            "False" | "FALSE" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
