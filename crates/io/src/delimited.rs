//! Local CSV/TSV exports.

use std::path::Path;

use studiorate_engine::{CellValue, RawRow};

use crate::error::LoadError;
use crate::workbook::rows_from_grid;

/// Read a delimited file into header-keyed rows.
///
/// `delimiter` of `None` means detect it from the first non-empty line.
pub fn read_delimited(path: &Path, delimiter: Option<u8>) -> Result<Vec<RawRow>, LoadError> {
    let content = read_file_as_utf8(path)?;
    parse_delimited(&content, delimiter)
}

pub fn parse_delimited(content: &str, delimiter: Option<u8>) -> Result<Vec<RawRow>, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(content));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut grid: Vec<Vec<CellValue>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(CellValue::from).collect());
    }
    Ok(rows_from_grid(grid))
}

/// Pick the delimiter that appears most often on the first non-empty line.
/// Comma wins ties.
pub fn detect_delimiter(content: &str) -> u8 {
    let Some(line) = content.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };

    let mut best = b',';
    let mut best_count = line.matches(',').count();
    for (delim, ch) in [(b';', ';'), (b'\t', '\t')] {
        let count = line.matches(ch).count();
        if count > best_count {
            best = delim;
            best_count = count;
        }
    }
    best
}

/// Read a file as UTF-8, falling back to Windows-1252 for legacy Excel exports.
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
