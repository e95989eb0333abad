//! Information-Theoretic Metafeatures over discretized attributes

use super::{entropy, Collector, FitData, GroupParams};
use crate::statistics::mean;

/// Sturges' rule, at least two bins
fn default_bins(n: usize) -> usize {
    let sturges = ((n.max(1) as f64).log2() + 1.0).ceil() as usize;
    sturges.max(2)
}

/// Equal-width bin index per row; `None` for missing values
pub(crate) fn discretize(column: &[f64], bins: usize) -> Vec<Option<usize>> {
    let (lo, hi) = column
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let width = (hi - lo) / bins as f64;

    column
        .iter()
        .map(|&v| {
            if v.is_nan() {
                None
            } else if width > 0.0 && width.is_finite() {
                Some((((v - lo) / width).floor() as usize).min(bins - 1))
            } else {
                Some(0)
            }
        })
        .collect()
}

pub(crate) fn compute(data: &FitData, params: &GroupParams, out: &mut Collector) {
    let bins = params.num_bins.unwrap_or_else(|| default_bins(data.n_rows()));

    let binned: Vec<Vec<Option<usize>>> = (0..data.n_columns())
        .map(|j| discretize(&data.x.column(j).to_vec(), bins))
        .collect();

    let attr_ent: Vec<f64> = binned
        .iter()
        .map(|col| {
            let mut counts = vec![0; bins];
            for b in col.iter().flatten() {
                counts[*b] += 1;
            }
            entropy(&counts)
        })
        .collect();
    out.summarized("attr_ent", &attr_ent);

    let Some(target) = &data.target else {
        return;
    };

    let class_ent = entropy(&target.class_counts());
    let k = target.n_classes;

    let joint_ent: Vec<f64> = binned
        .iter()
        .map(|col| {
            let mut counts = vec![0; bins * k];
            for (b, &c) in col.iter().zip(&target.classes) {
                if let Some(b) = b {
                    counts[b * k + c] += 1;
                }
            }
            entropy(&counts)
        })
        .collect();

    let mut_inf: Vec<f64> = attr_ent
        .iter()
        .zip(&joint_ent)
        .map(|(a, j)| a + class_ent - j)
        .collect();

    out.scalar("class_ent", class_ent);
    out.summarized("joint_ent", &joint_ent);
    out.summarized("mut_inf", &mut_inf);

    let mean_mut_inf = mean(&mut_inf);
    out.scalar("eq_num_attr", class_ent / mean_mut_inf);
    out.scalar("ns_ratio", (mean(&attr_ent) - mean_mut_inf) / mean_mut_inf);
}
