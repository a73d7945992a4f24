//! Grid abstraction over loaded sheets and metadata about their origin.

use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, json, etc.).
    pub format: String,
    /// Number of rows in the grid.
    pub row_count: usize,
    /// Number of columns in the grid.
    pub column_count: usize,
    /// When the file was loaded.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            analyzed_at: Utc::now(),
        }
    }
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Text content.
    Text(String),
    /// Numeric content (spreadsheet numbers, serial dates).
    Number(f64),
    /// Blank cell.
    #[default]
    Empty,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Build a cell from raw text; blank text becomes `Empty`.
    pub fn from_text(value: &str) -> Self {
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }

    /// True for blank cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            CellValue::Empty => true,
        }
    }

    /// Trimmed text of a non-empty string cell. Numbers are not strings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Display text of any non-empty cell, numbers included.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Text(_) => self.as_str().map(Cow::Borrowed),
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            CellValue::Number(n) => Some(Cow::Owned(n.to_string())),
            CellValue::Empty => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Read-only rectangular grid of cells addressed by zero-based row and column.
///
/// Every row has exactly `column_count` cells; short rows are padded with
/// [`CellValue::Empty`] on construction and reads outside the grid yield
/// an empty cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Vec<Vec<CellValue>>")]
pub struct TableView {
    rows: Vec<Vec<CellValue>>,
    column_count: usize,
}

impl TableView {
    /// Create a table whose width is the longest row.
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self::with_column_count(rows, column_count)
    }

    /// Create a table with a declared width, padding or truncating rows.
    pub fn with_column_count(mut rows: Vec<Vec<CellValue>>, column_count: usize) -> Self {
        for row in &mut rows {
            row.resize(column_count, CellValue::Empty);
        }
        Self { rows, column_count }
    }

    /// Create a table from string literals; blank strings become empty cells.
    pub fn from_strings<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|c| CellValue::from_text(c.as_ref())).collect())
                .collect(),
        )
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Get a specific cell; out-of-range addresses are empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Trimmed text of a non-empty string cell.
    pub fn text(&self, row: usize, col: usize) -> Option<&str> {
        self.cell(row, col).as_str()
    }

    /// Display text of a non-empty cell of any type.
    pub fn display(&self, row: usize, col: usize) -> Option<Cow<'_, str>> {
        self.cell(row, col).to_text()
    }

    /// Cells of one row (empty slice past the end).
    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty cells in a row.
    pub fn filled_in_row(&self, row: usize) -> usize {
        self.row(row).iter().filter(|c| !c.is_empty()).count()
    }
}

impl From<Vec<Vec<CellValue>>> for TableView {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Self::new(rows)
    }
}
