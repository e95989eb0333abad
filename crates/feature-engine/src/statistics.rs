//! Descriptive Statistics over Attribute Columns

/// Keep only the non-NaN values of a column
pub fn finite_values(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values.into_iter().filter(|v| !v.is_nan()).collect()
}

/// Arithmetic mean, NaN for empty input
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1), NaN for fewer than two values
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64
}

/// Quantile with linear interpolation between order statistics.
///
/// `sorted` must already be in ascending order.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Copy and sort ascending
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Median, NaN for empty input
pub fn median(values: &[f64]) -> f64 {
    quantile_sorted(&sorted(values), 0.5)
}

/// Sample covariance of two equally long series
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return f64::NAN;
    }
    let ma = mean(&a[..n]);
    let mb = mean(&b[..n]);
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / (n - 1) as f64
}

/// Pearson correlation, NaN when either series is constant
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let cov = covariance(a, b);
    let sa = sample_variance(a).sqrt();
    let sb = sample_variance(b).sqrt();
    if sa > 0.0 && sb > 0.0 {
        cov / (sa * sb)
    } else {
        f64::NAN
    }
}

/// Eigenvalues of a symmetric matrix (cyclic Jacobi rotations), descending
pub fn symmetric_eigenvalues(matrix: &[Vec<f64>]) -> Vec<f64> {
    const MAX_SWEEPS: usize = 100;
    const TOLERANCE: f64 = 1e-12;

    let n = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[i][j] * a[i][j])
            .sum();
        if off < TOLERANCE {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[k][p];
                    let akq = a[k][q];
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p][k];
                    let aqk = a[q][k];
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
            }
        }
    }

    let mut eigen: Vec<f64> = (0..n).map(|i| a[i][i]).collect();
    eigen.sort_by(|x, y| y.total_cmp(x));
    eigen
}

/// Per-attribute descriptive statistics
#[derive(Debug, Clone)]
pub struct ColumnStatistics {
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation
    pub sd: f64,
    /// Sample variance
    pub variance: f64,
    /// Skewness (asymmetry)
    pub skewness: f64,
    /// Excess kurtosis (tailedness)
    pub kurtosis: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Median
    pub median: f64,
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// Scaled median absolute deviation
    pub mad: f64,
    /// 20% trimmed mean
    pub trimmed_mean: f64,
    /// Geometric mean (NaN unless every value is positive)
    pub geometric_mean: f64,
    /// Harmonic mean (NaN unless every value is positive)
    pub harmonic_mean: f64,
    /// Number of distinct values
    pub distinct: usize,
    /// Number of values used
    pub count: usize,
}

impl Default for ColumnStatistics {
    fn default() -> Self {
        Self {
            mean: f64::NAN,
            sd: f64::NAN,
            variance: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            median: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
            mad: f64::NAN,
            trimmed_mean: f64::NAN,
            geometric_mean: f64::NAN,
            harmonic_mean: f64::NAN,
            distinct: 0,
            count: 0,
        }
    }
}

/// Consistency constant turning the MAD into a normal-sd estimate
const MAD_SCALE: f64 = 1.4826;
/// Fraction cut from each tail for the trimmed mean
const TRIM_FRACTION: f64 = 0.2;

impl ColumnStatistics {
    /// Compute statistics from a slice of values; NaN entries are ignored
    pub fn compute(values: &[f64]) -> Self {
        let sorted = sorted(&finite_values(values.iter().copied()));
        if sorted.is_empty() {
            return Self::default();
        }

        let n = sorted.len() as f64;

        // Mean
        let mean = sorted.iter().sum::<f64>() / n;

        // Central moments
        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;

        for &v in &sorted {
            let d = v - mean;
            m2 += d * d;
            m3 += d * d * d;
            m4 += d * d * d * d;
        }

        let pop_variance = m2 / n;
        let pop_sd = pop_variance.sqrt();

        // Skewness: E[(X-μ)³] / σ³
        let skewness = if pop_sd > 0.0 {
            (m3 / n) / (pop_sd * pop_sd * pop_sd)
        } else {
            f64::NAN
        };

        // Kurtosis: E[(X-μ)⁴] / σ⁴ - 3 (excess kurtosis)
        let kurtosis = if pop_sd > 0.0 {
            (m4 / n) / (pop_variance * pop_variance) - 3.0
        } else {
            f64::NAN
        };

        let variance = sample_variance(&sorted);
        let median = quantile_sorted(&sorted, 0.5);

        let deviations: Vec<f64> = sorted.iter().map(|v| (v - median).abs()).collect();
        let mad = MAD_SCALE * self::median(&deviations);

        let cut = (TRIM_FRACTION * n).floor() as usize;
        let trimmed_mean = self::mean(&sorted[cut..sorted.len() - cut]);

        let all_positive = sorted[0] > 0.0;
        let geometric_mean = if all_positive {
            (sorted.iter().map(|v| v.ln()).sum::<f64>() / n).exp()
        } else {
            f64::NAN
        };
        let harmonic_mean = if all_positive {
            n / sorted.iter().map(|v| 1.0 / v).sum::<f64>()
        } else {
            f64::NAN
        };

        let mut distinct = 1;
        for w in sorted.windows(2) {
            if w[0] != w[1] {
                distinct += 1;
            }
        }

        Self {
            mean,
            sd: variance.sqrt(),
            variance,
            skewness,
            kurtosis,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median,
            q1: quantile_sorted(&sorted, 0.25),
            q3: quantile_sorted(&sorted, 0.75),
            mad,
            trimmed_mean,
            geometric_mean,
            harmonic_mean,
            distinct,
            count: sorted.len(),
        }
    }

    /// Range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Interquartile range
    pub fn iq_range(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Sparsity: `(n / distinct - 1) / (n - 1)`, NaN for a single value
    pub fn sparsity(&self) -> f64 {
        if self.count < 2 {
            return f64::NAN;
        }
        let n = self.count as f64;
        (n / self.distinct as f64 - 1.0) / (n - 1.0)
    }

    /// Whether any value falls outside the 1.5 IQR whiskers.
    ///
    /// Only `min` and `max` need checking.
    pub fn has_outliers(&self) -> bool {
        let whisker = 1.5 * self.iq_range();
        self.min < self.q1 - whisker || self.max > self.q3 + whisker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = ColumnStatistics::compute(&values);
        assert!((stats.mean - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_sd_computation() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = ColumnStatistics::compute(&values);
        // Sample sd of this dataset is ~2.138
        assert!((stats.sd - 2.138).abs() < 0.01);
    }

    #[test]
    fn test_quartiles_and_median() {
        let stats = ColumnStatistics::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.iq_range(), 2.0);
    }

    #[test]
    fn test_nan_is_ignored() {
        let stats = ColumnStatistics::compute(&[1.0, f64::NAN, 3.0]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    fn test_empty_values() {
        let values: Vec<f64> = vec![];
        let stats = ColumnStatistics::compute(&values);
        assert!(stats.mean.is_nan());
        assert_eq!(stats.count, 0);
    }

    #[test]
    fn test_constant_column() {
        let stats = ColumnStatistics::compute(&[4.0, 4.0, 4.0]);
        assert_eq!(stats.variance, 0.0);
        assert!(stats.skewness.is_nan());
        assert_eq!(stats.distinct, 1);
        assert_eq!(stats.sparsity(), 1.0);
    }

    #[test]
    fn test_geometric_mean_requires_positive_values() {
        let stats = ColumnStatistics::compute(&[1.0, 4.0]);
        assert!((stats.geometric_mean - 2.0).abs() < 1e-12);
        assert!((stats.harmonic_mean - 1.6).abs() < 1e-12);
        let stats = ColumnStatistics::compute(&[0.0, 4.0]);
        assert!(stats.geometric_mean.is_nan());
    }

    #[test]
    fn test_outlier_detection() {
        let stats = ColumnStatistics::compute(&[1.0, 2.0, 2.0, 3.0, 2.0, 100.0]);
        assert!(stats.has_outliers());
        let stats = ColumnStatistics::compute(&[1.0, 2.0, 3.0, 4.0]);
        assert!(!stats.has_outliers());
    }

    #[test]
    fn test_pearson() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);
        assert!(pearson(&a, &[1.0, 1.0, 1.0, 1.0]).is_nan());
    }

    #[test]
    fn test_symmetric_eigenvalues() {
        let m = vec![vec![2.0, 1.0], vec![1.0, 2.0]];
        let eig = symmetric_eigenvalues(&m);
        assert!((eig[0] - 3.0).abs() < 1e-9);
        assert!((eig[1] - 1.0).abs() < 1e-9);
    }
}
