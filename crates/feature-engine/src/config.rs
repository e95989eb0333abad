//! Extraction Configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration handed to an extractor's constructor.
///
/// Built fresh for every dataset and never mutated afterwards. Nothing
/// here is validated by the adapter; the extractor decides what it accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Feature groups to compute (None = extractor defaults)
    pub groups: Option<Vec<String>>,
    /// Summary functions for multi-valued metafeatures (None = extractor defaults)
    pub summary: Option<Vec<String>>,
    /// Seed for randomized metafeatures
    pub random_state: Option<u64>,
    /// Extra options forwarded verbatim
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl ExtractionConfig {
    /// Restrict extraction to the given groups
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Select summary functions
    pub fn with_summary<I, S>(mut self, summary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.summary = Some(summary.into_iter().map(Into::into).collect());
        self
    }

    /// Seed randomized metafeatures
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Add a pass-through option
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Options for the extract phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Verbosity level (2 and above logs every metafeature)
    pub verbose: u8,
    /// Do not log warnings for non-finite metafeatures
    pub suppress_warnings: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            verbose: 1,
            suppress_warnings: true,
        }
    }
}
