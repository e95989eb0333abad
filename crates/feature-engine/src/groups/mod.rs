//! Metafeature Groups

mod general;
mod info_theory;
mod landmarking;
mod model_based;
mod statistical;

use crate::error::ExtractError;
use crate::summary::Summary;
use crate::value::MetafeatureValue;
use ndarray::{Array2, ArrayView1};
use std::str::FromStr;

/// A named category of metafeatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureGroup {
    General,
    Statistical,
    InfoTheory,
    ModelBased,
    Landmarking,
}

impl FeatureGroup {
    /// Every group, in computation order
    pub const ALL: [FeatureGroup; 5] = [
        FeatureGroup::General,
        FeatureGroup::Statistical,
        FeatureGroup::InfoTheory,
        FeatureGroup::ModelBased,
        FeatureGroup::Landmarking,
    ];

    /// Canonical group name
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureGroup::General => "general",
            FeatureGroup::Statistical => "statistical",
            FeatureGroup::InfoTheory => "info-theory",
            FeatureGroup::ModelBased => "model-based",
            FeatureGroup::Landmarking => "landmarking",
        }
    }

    /// Whether every metafeature of the group needs class labels
    pub fn is_supervised(&self) -> bool {
        matches!(self, FeatureGroup::ModelBased | FeatureGroup::Landmarking)
    }

    /// Parse group names; `all` and `default` expand to every group.
    ///
    /// Order follows first appearance, duplicates are dropped.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<FeatureGroup>, ExtractError> {
        let mut out = Vec::new();
        for name in names {
            let expanded: Vec<FeatureGroup> = match name.as_ref().trim().to_ascii_lowercase().as_str() {
                "all" | "default" => FeatureGroup::ALL.to_vec(),
                _ => vec![name.as_ref().parse()?],
            };
            for group in expanded {
                if !out.contains(&group) {
                    out.push(group);
                }
            }
        }
        Ok(out)
    }

    pub(crate) fn compute(&self, data: &FitData, params: &GroupParams, out: &mut Collector) {
        match self {
            FeatureGroup::General => general::compute(data, out),
            FeatureGroup::Statistical => statistical::compute(data, out),
            FeatureGroup::InfoTheory => info_theory::compute(data, params, out),
            FeatureGroup::ModelBased => model_based::compute(data, params, out),
            FeatureGroup::Landmarking => landmarking::compute(data, params, out),
        }
    }
}

impl FromStr for FeatureGroup {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "general" => Ok(FeatureGroup::General),
            "statistical" => Ok(FeatureGroup::Statistical),
            "info-theory" => Ok(FeatureGroup::InfoTheory),
            "model-based" => Ok(FeatureGroup::ModelBased),
            "landmarking" => Ok(FeatureGroup::Landmarking),
            _ => Err(ExtractError::UnsupportedGroup(s.to_string())),
        }
    }
}

/// Class labels mapped onto `0..n_classes`
#[derive(Debug, Clone)]
pub(crate) struct Target {
    /// Class index per row
    pub classes: Vec<usize>,
    /// Number of distinct classes
    pub n_classes: usize,
}

impl Target {
    /// Map raw labels onto class indices ordered by label value
    pub fn from_labels(labels: ArrayView1<f64>) -> Self {
        let mut values: Vec<f64> = labels.to_vec();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup_by(|a, b| a.total_cmp(b).is_eq());

        let classes = labels
            .iter()
            .map(|label| {
                values
                    .binary_search_by(|v| v.total_cmp(label))
                    .unwrap_or_default()
            })
            .collect();

        Self {
            classes,
            n_classes: values.len(),
        }
    }

    /// Number of rows per class
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &c in &self.classes {
            counts[c] += 1;
        }
        counts
    }
}

/// Data an extractor was fitted on
#[derive(Debug, Clone)]
pub(crate) struct FitData {
    pub x: Array2<f64>,
    pub target: Option<Target>,
}

impl FitData {
    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.x.ncols()
    }

    /// Column `j` with NaN entries removed
    pub fn finite_column(&self, j: usize) -> Vec<f64> {
        crate::statistics::finite_values(self.x.column(j).iter().copied())
    }
}

/// Tuning parameters shared by the groups
#[derive(Debug, Clone)]
pub(crate) struct GroupParams {
    pub random_state: u64,
    pub num_cv_folds: usize,
    pub lm_sample_frac: f64,
    pub max_tree_depth: Option<usize>,
    pub num_bins: Option<usize>,
}

/// Accumulates named metafeature values, applying summaries on the way in
pub(crate) struct Collector<'a> {
    summaries: &'a [Summary],
    entries: Vec<(String, MetafeatureValue)>,
}

impl<'a> Collector<'a> {
    pub fn new(summaries: &'a [Summary]) -> Self {
        Self {
            summaries,
            entries: Vec::new(),
        }
    }

    /// Record a single-valued metafeature
    pub fn scalar(&mut self, name: &str, value: impl Into<MetafeatureValue>) {
        self.entries.push((name.to_string(), value.into()));
    }

    /// Record a multi-valued metafeature as `<name>.<summary>` entries
    pub fn summarized(&mut self, name: &str, values: &[f64]) {
        for summary in self.summaries {
            self.entries
                .push((format!("{name}.{}", summary.as_str()), summary.apply(values)));
        }
    }

    /// Names and values sorted by name
    pub fn finish(mut self) -> (Vec<String>, Vec<MetafeatureValue>) {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self.entries.into_iter().unzip()
    }
}

/// Shannon entropy (bits) of a count vector
pub(crate) fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return f64::NAN;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}
