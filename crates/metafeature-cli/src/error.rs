//! Error types for the extraction driver

use dataset_loader::LoadError;
use feature_engine::ExtractError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures writing metafeature records
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Cannot open output {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures assembling [`crate::Settings`]
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid extractor option '{0}', expected KEY=VALUE")]
    Option(String),
}

/// Failures of one extraction run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Extraction failed for {dataset}: {source}")]
    Extract {
        dataset: String,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl PipelineError {
    /// Whether the error concerns a single dataset and the run may move on
    pub fn is_dataset_error(&self) -> bool {
        match self {
            PipelineError::Load(LoadError::Pattern(_) | LoadError::Glob(_)) => false,
            PipelineError::Load(_) | PipelineError::Extract { .. } => true,
            PipelineError::Sink(_) => false,
        }
    }
}
