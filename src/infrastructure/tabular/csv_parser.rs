// ============================================================
// CSV PARSER
// ============================================================
// Parse uploaded CSV bytes: comma-separated, UTF-8 or Windows-1252

use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::error::{AppError, Result};
use crate::domain::work_order::CellValue;

/// Headers plus raw cell grid, before column type inference
#[derive(Debug)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<CellValue>>,
}

/// Comma-separated parser with encoding detection
#[derive(Debug, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode raw upload bytes, then parse them
    pub fn parse_bytes(bytes: &[u8]) -> Result<CsvTable> {
        Self::new().parse_content(&decode_text(bytes))
    }

    /// Parse CSV content from string. Cells matching an NA marker become `Missing`.
    pub fn parse_content(&self, content: &str) -> Result<CsvTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .trim(Trim::None)
            .flexible(true) // Short rows are padded later
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::DecodeError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::DecodeError(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::DecodeError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > headers.len() {
                return Err(AppError::DecodeError(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    index + 2,
                    record.len()
                )));
            }

            let cells = record
                .iter()
                .map(|raw| {
                    if CellValue::is_na_marker(raw) {
                        CellValue::Missing
                    } else {
                        CellValue::Text(raw.to_string())
                    }
                })
                .collect();
            records.push(cells);
        }

        Ok(CsvTable { headers, records })
    }
}

/// UTF-8 first (BOM stripped), Windows-1252 for legacy spreadsheet exports
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}
