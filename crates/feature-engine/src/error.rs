//! Extraction Error Types

use thiserror::Error;

/// Errors raised by a metafeature extractor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// Unknown feature group name
    #[error("Unsupported feature group: {0}")]
    UnsupportedGroup(String),

    /// Unknown summary function name
    #[error("Unsupported summary function: {0}")]
    UnsupportedSummary(String),

    /// Unknown pass-through option or value of the wrong type
    #[error("Invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    /// Feature matrix without rows or columns
    #[error("Dataset is empty ({rows} rows, {columns} columns)")]
    EmptyDataset { rows: usize, columns: usize },

    /// Label vector length differs from the number of rows
    #[error("Feature matrix has {rows} rows but label vector has {labels} entries")]
    ShapeMismatch { rows: usize, labels: usize },

    /// `extract` called before `fit`
    #[error("Extractor has not been fitted")]
    NotFitted,
}
