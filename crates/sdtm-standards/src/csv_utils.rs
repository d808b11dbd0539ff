//! Shared CSV utilities for loading standards files.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{Result, StandardsError};

pub type CsvRow = BTreeMap<String, String>;

/// Read a CSV file into row maps keyed by header.
pub fn read_csv_rows(path: &Path) -> Result<Vec<CsvRow>> {
    let file = std::fs::File::open(path).map_err(|e| StandardsError::io(path, e))?;
    read_csv_rows_from(file, path)
}

/// Read CSV rows from any reader. `origin` names the source in errors.
///
/// Strips a UTF-8 BOM from headers and trims every value.
pub fn read_csv_rows_from<R: Read>(reader: R, origin: &Path) -> Result<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| StandardsError::csv(origin, e))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StandardsError::csv(origin, e))?;
        let mut row = BTreeMap::new();
        for (key, value) in headers.iter().zip(record.iter()) {
            row.insert(key.clone(), value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Field value, or an empty string if the column is absent.
pub fn get_field(row: &CsvRow, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

/// Field value, `None` if empty or absent.
pub fn get_optional(row: &CsvRow, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}
