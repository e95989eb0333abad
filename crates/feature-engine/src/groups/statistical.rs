//! Statistical Metafeatures: per-attribute distribution shape and attribute dependence

use super::{Collector, FitData};
use crate::statistics::{covariance, pearson, symmetric_eigenvalues, ColumnStatistics};
use ndarray::Axis;

/// |cor| at or above which an attribute pair counts as correlated
const COR_THRESHOLD: f64 = 0.5;

pub(crate) fn compute(data: &FitData, out: &mut Collector) {
    let columns: Vec<Vec<f64>> = (0..data.n_columns()).map(|j| data.finite_column(j)).collect();
    let stats: Vec<ColumnStatistics> = columns.iter().map(|c| ColumnStatistics::compute(c)).collect();

    let per_attr = |f: fn(&ColumnStatistics) -> f64| -> Vec<f64> { stats.iter().map(f).collect() };

    out.summarized("mean", &per_attr(|s| s.mean));
    out.summarized("sd", &per_attr(|s| s.sd));
    out.summarized("var", &per_attr(|s| s.variance));
    out.summarized("min", &per_attr(|s| s.min));
    out.summarized("max", &per_attr(|s| s.max));
    out.summarized("range", &per_attr(ColumnStatistics::range));
    out.summarized("median", &per_attr(|s| s.median));
    out.summarized("iq_range", &per_attr(ColumnStatistics::iq_range));
    out.summarized("mad", &per_attr(|s| s.mad));
    out.summarized("skewness", &per_attr(|s| s.skewness));
    out.summarized("kurtosis", &per_attr(|s| s.kurtosis));
    out.summarized("t_mean", &per_attr(|s| s.trimmed_mean));
    out.summarized("g_mean", &per_attr(|s| s.geometric_mean));
    out.summarized("h_mean", &per_attr(|s| s.harmonic_mean));
    out.summarized("sparsity", &per_attr(ColumnStatistics::sparsity));

    out.scalar(
        "nr_outliers",
        stats.iter().filter(|s| s.has_outliers()).count(),
    );

    // Pairwise statistics use only rows without missing values
    let complete = data
        .x
        .axis_iter(Axis(0))
        .filter(|row| row.iter().all(|v| !v.is_nan()))
        .count();
    let complete_columns: Vec<Vec<f64>> = (0..data.n_columns())
        .map(|j| {
            data.x
                .axis_iter(Axis(0))
                .filter(|row| row.iter().all(|v| !v.is_nan()))
                .map(|row| row[j])
                .collect()
        })
        .collect();

    let n_attr = complete_columns.len();
    let mut cor = Vec::new();
    let mut cov = Vec::new();
    let mut cov_matrix = vec![vec![0.0; n_attr]; n_attr];

    for i in 0..n_attr {
        for j in i..n_attr {
            let c = covariance(&complete_columns[i], &complete_columns[j]);
            cov_matrix[i][j] = c;
            cov_matrix[j][i] = c;
            if i != j {
                cov.push(c.abs());
                cor.push(pearson(&complete_columns[i], &complete_columns[j]).abs());
            }
        }
    }

    out.summarized("cor", &cor);
    out.summarized("cov", &cov);

    let nr_cor_attr = if cor.is_empty() {
        f64::NAN
    } else {
        cor.iter().filter(|&&c| c >= COR_THRESHOLD).count() as f64 / cor.len() as f64
    };
    out.scalar("nr_cor_attr", nr_cor_attr);

    let eigenvalues = if complete >= 2 && cov_matrix.iter().flatten().all(|v| v.is_finite()) {
        symmetric_eigenvalues(&cov_matrix)
    } else {
        Vec::new()
    };
    out.summarized("eigenvalues", &eigenvalues);
}
