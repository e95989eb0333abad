//! Summary Functions for Multi-Valued Metafeatures

use crate::error::ExtractError;
use crate::statistics::{finite_values, mean, quantile_sorted, sample_variance, sorted};
use crate::value::MetafeatureValue;
use std::str::FromStr;

/// Reduces a vector of values to a single scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    Mean,
    Sd,
    Var,
    Min,
    Max,
    Median,
    Range,
    Count,
}

/// Summaries applied when none are configured
pub const DEFAULT_SUMMARIES: [Summary; 2] = [Summary::Mean, Summary::Sd];

impl Summary {
    /// Suffix appended to the metafeature name
    pub fn as_str(&self) -> &'static str {
        match self {
            Summary::Mean => "mean",
            Summary::Sd => "sd",
            Summary::Var => "var",
            Summary::Min => "min",
            Summary::Max => "max",
            Summary::Median => "median",
            Summary::Range => "range",
            Summary::Count => "count",
        }
    }

    /// Apply the summary, ignoring NaN entries
    pub fn apply(&self, values: &[f64]) -> MetafeatureValue {
        let values = finite_values(values.iter().copied());
        let value = match self {
            Summary::Count => return MetafeatureValue::from(values.len()),
            Summary::Mean => mean(&values),
            Summary::Sd => sample_variance(&values).sqrt(),
            Summary::Var => sample_variance(&values),
            Summary::Min => values.iter().copied().reduce(f64::min).unwrap_or(f64::NAN),
            Summary::Max => values.iter().copied().reduce(f64::max).unwrap_or(f64::NAN),
            Summary::Median => quantile_sorted(&sorted(&values), 0.5),
            Summary::Range => {
                let min = values.iter().copied().reduce(f64::min);
                let max = values.iter().copied().reduce(f64::max);
                match (min, max) {
                    (Some(lo), Some(hi)) => hi - lo,
                    _ => f64::NAN,
                }
            }
        };
        MetafeatureValue::Float(value)
    }

    /// Parse a list of names, keeping order and dropping duplicates
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Summary>, ExtractError> {
        let mut out = Vec::new();
        for name in names {
            let summary = name.as_ref().parse()?;
            if !out.contains(&summary) {
                out.push(summary);
            }
        }
        Ok(out)
    }
}

impl FromStr for Summary {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Summary::Mean),
            "sd" => Ok(Summary::Sd),
            "var" => Ok(Summary::Var),
            "min" => Ok(Summary::Min),
            "max" => Ok(Summary::Max),
            "median" => Ok(Summary::Median),
            "range" => Ok(Summary::Range),
            "count" => Ok(Summary::Count),
            _ => Err(ExtractError::UnsupportedSummary(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn float(v: MetafeatureValue) -> f64 {
        v.as_f64().unwrap()
    }

    #[test]
    fn test_basic_summaries() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(float(Summary::Mean.apply(&values)), 2.5);
        assert_eq!(float(Summary::Min.apply(&values)), 1.0);
        assert_eq!(float(Summary::Max.apply(&values)), 4.0);
        assert_eq!(float(Summary::Median.apply(&values)), 2.5);
        assert_eq!(float(Summary::Range.apply(&values)), 3.0);
        assert_eq!(Summary::Count.apply(&values), MetafeatureValue::Integer(4));
    }

    #[test]
    fn test_sd_of_single_value_is_nan() {
        assert!(float(Summary::Sd.apply(&[1.0])).is_nan());
        assert!(float(Summary::Mean.apply(&[])).is_nan());
    }

    #[test]
    fn test_nan_entries_are_ignored() {
        let values = [1.0, f64::NAN, 3.0];
        assert_eq!(float(Summary::Mean.apply(&values)), 2.0);
        assert_eq!(Summary::Count.apply(&values), MetafeatureValue::Integer(2));
    }

    #[test]
    fn test_parse_list() {
        let parsed = Summary::parse_list(&["mean", "SD", "mean"]).unwrap();
        assert_eq!(parsed, vec![Summary::Mean, Summary::Sd]);
        assert_eq!(
            Summary::parse_list(&["mode"]),
            Err(ExtractError::UnsupportedSummary("mode".to_string()))
        );
    }

    proptest! {
        #[test]
        fn prop_mean_within_bounds(values in proptest::collection::vec(-1e6f64..1e6, 1..50)) {
            let m = float(Summary::Mean.apply(&values));
            let lo = float(Summary::Min.apply(&values));
            let hi = float(Summary::Max.apply(&values));
            prop_assert!(m >= lo - 1e-6 && m <= hi + 1e-6);
        }

        #[test]
        fn prop_variance_non_negative(values in proptest::collection::vec(-1e3f64..1e3, 2..50)) {
            prop_assert!(float(Summary::Var.apply(&values)) >= 0.0);
        }
    }
}
