//! Dataset Loader
//!
//! Discovers preprocessed datasets stored as file pairs sharing a base path:
//! `<base>.X` holds the feature matrix (CSV with header) and `<base>.y` the
//! label column (CSV, no header). The locator walks a glob pattern lazily and
//! loads one dataset at a time.

mod dataset;
mod error;
mod exclusion;
mod locator;
mod reader;

pub use dataset::{Dataset, DatasetRef, FEATURES_SUFFIX, LABELS_SUFFIX};
pub use error::LoadError;
pub use exclusion::ExclusionPolicy;
pub use locator::{DatasetLocator, DEFAULT_PATTERN};
pub use reader::{read_feature_matrix, read_label_vector};
