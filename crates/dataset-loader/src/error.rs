//! Loader Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering or reading dataset files
#[derive(Debug, Error)]
pub enum LoadError {
    /// Discovery pattern could not be compiled
    #[error("Invalid dataset pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A path matched by the pattern could not be read while walking
    #[error("Unreadable path during discovery: {0}")]
    Glob(#[from] glob::GlobError),

    /// Expected dataset file does not exist
    #[error("No such file: {}", path.display())]
    NotFound { path: PathBuf },

    /// Underlying I/O failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV syntax error (bad quoting, inconsistent column count, ...)
    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Cell that is neither numeric nor a missing-value marker
    #[error("{}: row {row}, column '{column}': '{value}' is not a number", path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// File has the wrong number of columns for its role
    #[error("{}: {reason}", path.display())]
    Shape { path: PathBuf, reason: String },
}

impl LoadError {
    /// Wrap an I/O error, mapping `NotFound` onto the dedicated variant
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path }
        } else {
            LoadError::Io { path, source: err }
        }
    }

    /// Wrap a CSV error, keeping missing files on the `NotFound` variant
    pub(crate) fn csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let path = path.into();
        if let csv::ErrorKind::Io(io) = err.kind() {
            if io.kind() == std::io::ErrorKind::NotFound {
                return LoadError::NotFound { path };
            }
        }
        LoadError::Csv { path, source: err }
    }
}
