//! Dataset References and Loaded Datasets

use crate::error::LoadError;
use crate::reader::{read_feature_matrix, read_label_vector};
use ndarray::{Array1, Array2};
use std::path::{Path, PathBuf};

/// Suffix of the feature-matrix file
pub const FEATURES_SUFFIX: &str = ".X";
/// Suffix of the label-vector file
pub const LABELS_SUFFIX: &str = ".y";

/// A dataset on disk: base path (no extension) plus logical name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    base: PathBuf,
    name: String,
}

impl DatasetRef {
    /// Build a reference from a base path, the name is its final segment
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let name = base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { base, name }
    }

    /// Build a reference from a feature-file path by trimming its suffix.
    ///
    /// Returns `None` when the path does not end with [`FEATURES_SUFFIX`].
    pub fn from_features_path(path: &Path) -> Option<Self> {
        let text = path.to_str()?;
        let base = text.strip_suffix(FEATURES_SUFFIX)?;
        if base.is_empty() || base.ends_with(std::path::MAIN_SEPARATOR) {
            return None;
        }
        Some(Self::new(base))
    }

    /// Logical dataset name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base path without extension
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the feature-matrix file
    pub fn features_path(&self) -> PathBuf {
        with_suffix(&self.base, FEATURES_SUFFIX)
    }

    /// Path of the label-vector file
    pub fn labels_path(&self) -> PathBuf {
        with_suffix(&self.base, LABELS_SUFFIX)
    }

    /// Read the feature matrix and, when requested, the label vector
    pub fn load(&self, with_labels: bool) -> Result<Dataset, LoadError> {
        let (columns, features) = read_feature_matrix(&self.features_path())?;
        let labels = if with_labels {
            Some(read_label_vector(&self.labels_path())?)
        } else {
            None
        };

        Ok(Dataset {
            name: self.name.clone(),
            columns,
            features,
            labels,
        })
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw = base.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// A loaded dataset, ready for metafeature extraction
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Logical dataset name
    pub name: String,
    /// Column names from the feature-file header
    pub columns: Vec<String>,
    /// Samples x attributes
    pub features: Array2<f64>,
    /// One label per sample; row count is not checked here
    pub labels: Option<Array1<f64>>,
}

impl Dataset {
    /// Number of samples
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of attributes
    pub fn n_columns(&self) -> usize {
        self.features.ncols()
    }
}
