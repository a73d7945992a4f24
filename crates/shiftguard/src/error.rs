//! Error types for the shiftguard library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shiftguard operations.
#[derive(Debug, Error)]
pub enum ShiftguardError {
    /// No header row could be located within the scan window.
    #[error("Layout not found: no header row within the first {scanned_rows} rows")]
    LayoutNotFound { scanned_rows: usize },

    /// The rule sheet has no identifiable business-line row.
    #[error("Malformed rule table: {0}")]
    MalformedRuleTable(String),

    /// A layout was inferred only through fallback heuristics.
    #[error("Low-confidence layout: {}", fallbacks.join("; "))]
    LowConfidenceLayout { fallbacks: Vec<String> },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for shiftguard operations.
pub type Result<T> = std::result::Result<T, ShiftguardError>;
