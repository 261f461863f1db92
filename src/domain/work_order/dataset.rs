// ============================================================
// DATASET & RAW ROW
// ============================================================
// Decoded upload: ordered headers plus one RawRow per record

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

use super::CellValue;

/// One decoded record: column name -> cell, in header order
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    fields: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(fields: Vec<(String, CellValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when at least one cell is missing
    pub fn has_missing(&self) -> bool {
        self.fields.iter().any(|(_, value)| value.is_missing())
    }
}

impl Serialize for RawRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A decoded table
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl Dataset {
    /// Build a dataset from raw headers and cell grids.
    ///
    /// Blank headers become `Unnamed: <index>`, duplicates get `.1`, `.2`
    /// suffixes. Short records are padded with `Missing`; a record wider than
    /// the header adds `Unnamed: <index>` columns so no cell is lost.
    pub fn new(mut headers: Vec<String>, records: Vec<Vec<CellValue>>) -> Self {
        let width = records.iter().map(Vec::len).max().unwrap_or(0);
        if width > headers.len() {
            headers.resize(width, String::new());
        }
        let headers = unique_headers(headers);
        let rows = records
            .into_iter()
            .map(|mut cells| {
                cells.resize(headers.len(), CellValue::Missing);
                RawRow::new(headers.iter().cloned().zip(cells).collect())
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<RawRow> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// rows x columns, what the `/file` endpoint reports as `row_count`
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.column_count()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }

    /// Required columns absent from the header, in the order they were asked for
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|column| !self.has_column(column))
            .map(|column| column.to_string())
            .collect()
    }

    /// Rename every column with `rename`, keeping headers unique.
    pub fn rename_columns<F>(self, rename: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let renamed: Vec<String> = self.headers.iter().map(|header| rename(header)).collect();
        let headers = unique_headers(renamed);
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                RawRow::new(
                    headers
                        .iter()
                        .cloned()
                        .zip(row.fields.into_iter().map(|(_, value)| value))
                        .collect(),
                )
            })
            .collect();

        Self { headers, rows }
    }

    /// Drop every row holding at least one missing cell
    pub fn drop_incomplete_rows(self) -> Self {
        let rows = self.rows.into_iter().filter(|row| !row.has_missing()).collect();
        Self {
            headers: self.headers,
            rows,
        }
    }
}

fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(headers.len());

    for (index, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            header
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        result.push(candidate);
    }

    result
}
