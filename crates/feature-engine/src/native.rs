//! Native Metafeature Extractor

use crate::config::{ExtractOptions, ExtractionConfig};
use crate::error::ExtractError;
use crate::extractor::MetafeatureExtractor;
use crate::groups::{Collector, FeatureGroup, FitData, GroupParams, Target};
use crate::summary::{Summary, DEFAULT_SUMMARIES};
use crate::value::MetafeatureValue;
use ndarray::{ArrayView1, ArrayView2};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default number of cross-validation folds for landmarking
pub const DEFAULT_CV_FOLDS: usize = 10;
/// Default seed when none is configured
pub const DEFAULT_RANDOM_STATE: u64 = 0;

/// Upper bound for `num_cv_folds` (clamped to the row count during extraction)
pub const MAX_CV_FOLDS: usize = 1000;
/// Upper bound for `num_bins`
pub const MAX_BINS: usize = 4096;

/// Options accepted in [`ExtractionConfig::options`]
pub const KNOWN_OPTIONS: [&str; 4] = ["num_cv_folds", "lm_sample_frac", "max_tree_depth", "num_bins"];

/// Built-in extractor computing general, statistical, info-theory,
/// model-based and landmarking metafeatures.
#[derive(Debug, Clone)]
pub struct NativeExtractor {
    groups: Vec<FeatureGroup>,
    summaries: Vec<Summary>,
    params: GroupParams,
    data: Option<FitData>,
}

fn invalid(key: &str, reason: impl Into<String>) -> ExtractError {
    ExtractError::InvalidOption {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn int_option(key: &str, value: &Value, min: usize, max: usize) -> Result<usize, ExtractError> {
    let n = value
        .as_u64()
        .ok_or_else(|| invalid(key, format!("expected a non-negative integer, got {value}")))?;
    match usize::try_from(n) {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(invalid(key, format!("must be between {min} and {max}"))),
    }
}

impl NativeExtractor {
    fn parse_params(config: &ExtractionConfig) -> Result<GroupParams, ExtractError> {
        let mut params = GroupParams {
            random_state: config.random_state.unwrap_or(DEFAULT_RANDOM_STATE),
            num_cv_folds: DEFAULT_CV_FOLDS,
            lm_sample_frac: 1.0,
            max_tree_depth: None,
            num_bins: None,
        };

        for (key, value) in &config.options {
            match key.as_str() {
                "num_cv_folds" => params.num_cv_folds = int_option(key, value, 2, MAX_CV_FOLDS)?,
                "max_tree_depth" => {
                    params.max_tree_depth = Some(int_option(key, value, 1, usize::MAX)?)
                }
                "num_bins" => params.num_bins = Some(int_option(key, value, 2, MAX_BINS)?),
                "lm_sample_frac" => {
                    let frac = value
                        .as_f64()
                        .ok_or_else(|| invalid(key, format!("expected a number, got {value}")))?;
                    if !(frac > 0.0 && frac <= 1.0) {
                        return Err(invalid(key, "must be in (0, 1]"));
                    }
                    params.lm_sample_frac = frac;
                }
                _ => {
                    return Err(invalid(
                        key,
                        format!("unknown option, expected one of {}", KNOWN_OPTIONS.join(", ")),
                    ))
                }
            }
        }

        Ok(params)
    }
}

impl MetafeatureExtractor for NativeExtractor {
    fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let groups = match &config.groups {
            Some(names) => FeatureGroup::parse_list(names)?,
            None => FeatureGroup::ALL.to_vec(),
        };
        let summaries = match &config.summary {
            Some(names) => Summary::parse_list(names)?,
            None => DEFAULT_SUMMARIES.to_vec(),
        };
        let params = Self::parse_params(config)?;

        debug!(
            "Native extractor: groups={:?}, summaries={:?}, params={:?}",
            groups, summaries, params
        );

        Ok(Self {
            groups,
            summaries,
            params,
            data: None,
        })
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: Option<ArrayView1<f64>>) -> Result<(), ExtractError> {
        let (rows, columns) = x.dim();
        if rows == 0 || columns == 0 {
            return Err(ExtractError::EmptyDataset { rows, columns });
        }

        let target = match y {
            Some(labels) if labels.len() != rows => {
                return Err(ExtractError::ShapeMismatch {
                    rows,
                    labels: labels.len(),
                });
            }
            Some(labels) => Some(Target::from_labels(labels)),
            None => None,
        };

        self.data = Some(FitData {
            x: x.to_owned(),
            target,
        });
        Ok(())
    }

    fn extract(
        &self,
        options: &ExtractOptions,
    ) -> Result<(Vec<String>, Vec<MetafeatureValue>), ExtractError> {
        let data = self.data.as_ref().ok_or(ExtractError::NotFitted)?;
        let mut out = Collector::new(&self.summaries);

        for group in &self.groups {
            if group.is_supervised() && data.target.is_none() {
                if options.verbose > 0 {
                    info!("Skipping {} metafeatures: no labels", group.as_str());
                }
                continue;
            }
            debug!("Computing {} metafeatures", group.as_str());
            group.compute(data, &self.params, &mut out);
        }

        let (names, values) = out.finish();

        for (name, value) in names.iter().zip(&values) {
            if options.verbose >= 2 {
                debug!("{} = {}", name, value);
            }
            if !options.suppress_warnings && !value.is_finite() {
                warn!("Metafeature {} is not finite: {}", name, value);
            }
        }

        Ok((names, values))
    }
}
