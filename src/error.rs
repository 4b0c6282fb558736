use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for sheetlabel operations.
#[derive(Debug, Error)]
pub enum SheetLabelError {
    #[error("Invalid interval [{min}, {max}]: {reason}")]
    InvalidInterval { min: f64, max: f64, reason: String },

    #[error("Inconsistent containment for '{key}': {message}")]
    InconsistentContainment { key: String, message: String },

    #[error("Unknown parent '{parent}' referenced by '{child}' (parents must appear before their children)")]
    UnknownParent { parent: String, child: String },

    #[error("Invalid A1 address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Unknown annotation label: {0}")]
    UnknownLabel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV from {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid CSV data in {path}: {message}")]
    CsvInvalid { path: PathBuf, message: String },

    #[error("Failed to parse layout JSON from {path}: {source}")]
    LayoutParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl SheetLabelError {
    pub(crate) fn containment(key: impl Into<String>, message: impl Into<String>) -> Self {
        SheetLabelError::InconsistentContainment {
            key: key.into(),
            message: message.into(),
        }
    }
}
