//! Metafeature Engine
//!
//! Computes dataset-level descriptors (metafeatures) for meta-learning.
//!
//! Extraction follows a two-phase protocol: an extractor is built from an
//! [`ExtractionConfig`], fitted on a feature matrix (and optionally labels),
//! then asked to `extract` parallel name/value lists. [`extract_dataset`]
//! drives that protocol for any [`MetafeatureExtractor`]; [`NativeExtractor`]
//! is the built-in implementation.

mod config;
mod error;
mod extractor;
mod groups;
mod native;
mod record;
mod statistics;
mod summary;
mod tree;
mod value;

pub use config::{ExtractOptions, ExtractionConfig};
pub use error::ExtractError;
pub use extractor::{extract_dataset, MetafeatureExtractor, Metafeatures};
pub use groups::FeatureGroup;
pub use native::{
    NativeExtractor, DEFAULT_CV_FOLDS, DEFAULT_RANDOM_STATE, KNOWN_OPTIONS, MAX_BINS, MAX_CV_FOLDS,
};
pub use record::{MetafeatureRecord, NAME_KEY};
pub use statistics::ColumnStatistics;
pub use summary::{Summary, DEFAULT_SUMMARIES};
pub use value::MetafeatureValue;
