//! Local spreadsheet file: xlsx/xls/xlsb/ods via calamine, csv/tsv/txt via the delimited reader.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use studiorate_engine::{CellValue, RawRow};
use tracing::debug;

use crate::delimited::read_delimited;
use crate::error::LoadError;
use crate::source::SheetSource;

pub const DEFAULT_WORKBOOK_PATH: &str = "public/data/addons.xlsx";

/// A spreadsheet on disk. Only the first sheet is read.
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    path: PathBuf,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl SheetSource for WorkbookSource {
    fn identity(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn load(&self) -> Result<Vec<RawRow>, LoadError> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "txt" => read_delimited(&self.path, None),
            "tsv" => read_delimited(&self.path, Some(b'\t')),
            _ => read_first_sheet(&self.path),
        }
    }
}

/// Read the first sheet of a binary workbook.
pub fn read_first_sheet(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| LoadError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let Some(first) = workbook.sheet_names().first().cloned() else {
        return Err(LoadError::NoSheets(path.to_path_buf()));
    };

    let range = workbook.worksheet_range(&first).map_err(|e| LoadError::Workbook {
        path: path.to_path_buf(),
        message: format!("sheet '{first}': {e}"),
    })?;

    debug!(path = %path.display(), sheet = %first, size = ?range.get_size(), "reading workbook sheet");

    let grid: Vec<Vec<CellValue>> = range.rows().map(|row| row.iter().map(data_to_cell).collect()).collect();
    Ok(rows_from_grid(grid))
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::from(""),
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::from(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
    }
}

fn is_blank(cell: &CellValue) -> bool {
    match cell {
        CellValue::Text(s) => s.trim().is_empty(),
        other => other.is_blank(),
    }
}

/// Turn a cell grid into header-keyed rows.
///
/// The first non-blank row holds the headers. Blank headers become
/// `col_{i}`; repeated headers get a `_1`, `_2`… suffix. Fully blank data
/// rows are dropped and missing cells default to empty text.
pub(crate) fn rows_from_grid(grid: Vec<Vec<CellValue>>) -> Vec<RawRow> {
    let mut rows = grid.into_iter().skip_while(|r| r.iter().all(is_blank));
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let data: Vec<Vec<CellValue>> = rows.filter(|r| !r.iter().all(is_blank)).collect();

    let width = data.iter().map(Vec::len).chain([header_row.len()]).max().unwrap_or(0);
    let labels: Vec<String> = header_row.iter().map(CellValue::to_text).collect();
    let headers = unique_headers(&labels, width);

    data.into_iter()
        .map(|cells| {
            let mut cells = cells.into_iter();
            headers
                .iter()
                .map(|h| (h.clone(), cells.next().unwrap_or_else(|| CellValue::from(""))))
                .collect()
        })
        .collect()
}

/// Header names for `width` columns: blanks become `col_{i}`, repeats get `_1`, `_2`….
pub(crate) fn unique_headers(labels: &[String], width: usize) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(width);
    for i in 0..width {
        let text = labels.get(i).map(|l| l.trim().to_string()).unwrap_or_default();
        let base = if text.is_empty() { format!("col_{i}") } else { text };

        let mut name = base.clone();
        let mut n = 1;
        while headers.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        headers.push(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<CellValue>> {
        rows.iter().map(|r| r.iter().map(|s| CellValue::from(*s)).collect()).collect()
    }

    #[test]
    fn header_row_after_blank_lines() {
        let rows = rows_from_grid(grid(&[&["", ""], &["Paket", "Cena"], &["Premium", "900"]]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Cena"), Some(&CellValue::from("900")));
    }

    #[test]
    fn duplicate_and_blank_headers() {
        let rows = rows_from_grid(grid(&[&["Dron", "", "Dron", "Dron"], &["1", "2", "3", "4"]]));
        assert_eq!(rows[0].headers().collect::<Vec<_>>(), vec!["Dron", "col_1", "Dron_1", "Dron_2"]);
    }

    #[test]
    fn wide_data_rows_get_generated_headers() {
        let rows = rows_from_grid(grid(&[&["Paket"], &["Premium", "extra"]]));
        assert_eq!(rows[0].get("col_1"), Some(&CellValue::from("extra")));
    }

    #[test]
    fn blank_rows_dropped() {
        let rows = rows_from_grid(grid(&[&["Paket", "Cena"], &["", " "], &["Standard", "500"]]));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn empty_grid() {
        assert!(rows_from_grid(Vec::new()).is_empty());
        assert!(rows_from_grid(grid(&[&["Paket", "Cena"]])).is_empty());
    }

    #[test]
    fn calamine_values() {
        assert_eq!(data_to_cell(&Data::Empty), CellValue::from(""));
        assert_eq!(data_to_cell(&Data::Float(900.0)), CellValue::Number(900.0));
        assert_eq!(data_to_cell(&Data::Int(150)), CellValue::Number(150.0));
        assert_eq!(data_to_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(data_to_cell(&Data::String("✓".into())), CellValue::from("✓"));
    }

    #[test]
    fn missing_workbook_fails() {
        let src = WorkbookSource::new("/no/such/addons.xlsx");
        assert!(!src.exists());
        assert!(matches!(src.load(), Err(LoadError::Io { .. })));
        assert_eq!(src.identity(), "file:/no/such/addons.xlsx");
    }
}
