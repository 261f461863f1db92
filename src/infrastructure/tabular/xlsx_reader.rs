// ============================================================
// XLSX READER
// ============================================================
// Read the first worksheet of an uploaded workbook

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::error::{AppError, Result};
use crate::domain::work_order::CellValue;

use super::csv_parser::CsvTable;

/// Read the first sheet: first row is the header, the rest are records.
pub fn read_first_sheet(bytes: &[u8]) -> Result<CsvTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::DecodeError(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::DecodeError("Workbook has no worksheet".to_string()))?
        .map_err(|e| AppError::DecodeError(format!("Failed to read worksheet: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(header_text).collect(),
        None => {
            return Err(AppError::DecodeError(
                "Worksheet is empty".to_string(),
            ))
        }
    };

    let records = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_missing()))
        .collect();

    Ok(CsvTable { headers, records })
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_value(other).render().unwrap_or_default(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(s) if CellValue::is_na_marker(s) => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::Text(value.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
