//! Landmarking Metafeatures: cross-validated accuracy of simple learners

use super::{Collector, FitData, GroupParams};
use crate::tree::{split_gain, DecisionTree, TreeParams};
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Relative variance floor for Gaussian naive Bayes
const VAR_SMOOTHING: f64 = 1e-9;

/// Split `rows` into `k` test folds, dealing each class round-robin
pub(crate) fn stratified_folds(
    rows: &[usize],
    classes: &[usize],
    n_classes: usize,
    k: usize,
    rng: &mut StdRng,
) -> Vec<Vec<usize>> {
    let mut folds = vec![Vec::new(); k];
    let mut next = 0;
    for class in 0..n_classes {
        let mut members: Vec<usize> = rows.iter().copied().filter(|&r| classes[r] == class).collect();
        members.shuffle(rng);
        for r in members {
            folds[next % k].push(r);
            next += 1;
        }
    }
    for fold in &mut folds {
        fold.sort_unstable();
    }
    folds
}

fn accuracy(test: &[usize], y: &[usize], predict: impl Fn(usize) -> usize) -> f64 {
    let hits = test.iter().filter(|&&r| predict(r) == y[r]).count();
    hits as f64 / test.len() as f64
}

/// 1-nearest-neighbour prediction (Euclidean, missing coordinates skipped)
fn nearest_neighbour(x: ArrayView2<f64>, y: &[usize], train: &[usize], features: &[usize], row: usize) -> usize {
    let mut best = (f64::INFINITY, 0);
    for &t in train {
        let d: f64 = features
            .iter()
            .map(|&j| x[[row, j]] - x[[t, j]])
            .filter(|d| !d.is_nan())
            .map(|d| d * d)
            .sum();
        if d < best.0 {
            best = (d, y[t]);
        }
    }
    best.1
}

/// Gaussian naive Bayes fitted on the training rows
struct NaiveBayes {
    log_prior: Vec<f64>,
    means: Vec<Vec<f64>>,
    vars: Vec<Vec<f64>>,
}

impl NaiveBayes {
    fn fit(x: ArrayView2<f64>, y: &[usize], n_classes: usize, train: &[usize]) -> Self {
        let n_attr = x.ncols();
        let mut counts = vec![0usize; n_classes];
        let mut sums = vec![vec![0.0; n_attr]; n_classes];
        let mut squares = vec![vec![0.0; n_attr]; n_classes];
        let mut present = vec![vec![0usize; n_attr]; n_classes];

        for &r in train {
            let c = y[r];
            counts[c] += 1;
            for j in 0..n_attr {
                let v = x[[r, j]];
                if !v.is_nan() {
                    sums[c][j] += v;
                    squares[c][j] += v * v;
                    present[c][j] += 1;
                }
            }
        }

        let mut means = vec![vec![f64::NAN; n_attr]; n_classes];
        let mut vars = vec![vec![f64::NAN; n_attr]; n_classes];
        let mut max_var: f64 = 0.0;
        for c in 0..n_classes {
            for j in 0..n_attr {
                if present[c][j] > 0 {
                    let n = present[c][j] as f64;
                    let m = sums[c][j] / n;
                    means[c][j] = m;
                    vars[c][j] = (squares[c][j] / n - m * m).max(0.0);
                    max_var = max_var.max(vars[c][j]);
                }
            }
        }
        let epsilon = (VAR_SMOOTHING * max_var).max(f64::MIN_POSITIVE);
        for row in &mut vars {
            for v in row.iter_mut() {
                *v += epsilon;
            }
        }

        let total = train.len().max(1) as f64;
        let log_prior = counts
            .iter()
            .map(|&c| if c == 0 { f64::NEG_INFINITY } else { (c as f64 / total).ln() })
            .collect();

        Self {
            log_prior,
            means,
            vars,
        }
    }

    fn predict(&self, x: ArrayView2<f64>, row: usize) -> usize {
        let mut best = (f64::NEG_INFINITY, 0);
        for (c, prior) in self.log_prior.iter().enumerate() {
            if !prior.is_finite() {
                continue;
            }
            let mut score = *prior;
            for (j, (&m, &v)) in self.means[c].iter().zip(&self.vars[c]).enumerate() {
                let value = x[[row, j]];
                if value.is_nan() || m.is_nan() {
                    continue;
                }
                score -= 0.5 * (2.0 * std::f64::consts::PI * v).ln() + (value - m).powi(2) / (2.0 * v);
            }
            if score > best.0 {
                best = (score, c);
            }
        }
        best.1
    }
}

fn stump(x: ArrayView2<f64>, y: &[usize], n_classes: usize, train: &[usize], features: &[usize]) -> DecisionTree {
    DecisionTree::fit(x, y, n_classes, train, features, TreeParams { max_depth: Some(1) })
}

/// Subsample rows when `frac < 1`
fn sample_rows(n: usize, frac: f64, rng: &mut StdRng) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..n).collect();
    if frac < 1.0 {
        let keep = ((n as f64 * frac).round() as usize).clamp(1, n.max(1));
        rows.shuffle(rng);
        rows.truncate(keep);
        rows.sort_unstable();
    }
    rows
}

#[derive(Default)]
struct Scores {
    best_node: Vec<f64>,
    elite_nn: Vec<f64>,
    naive_bayes: Vec<f64>,
    one_nn: Vec<f64>,
    random_node: Vec<f64>,
    worst_node: Vec<f64>,
}

pub(crate) fn compute(data: &FitData, params: &GroupParams, out: &mut Collector) {
    let Some(target) = &data.target else {
        return;
    };

    let x = data.x.view();
    let y = &target.classes;
    let k = target.n_classes;
    let n_attr = data.n_columns();
    let all_features: Vec<usize> = (0..n_attr).collect();

    let mut rng = StdRng::seed_from_u64(params.random_state);
    let rows = sample_rows(data.n_rows(), params.lm_sample_frac, &mut rng);
    let random_attr = rng.gen_range(0..n_attr);
    let n_folds = params.num_cv_folds.clamp(1, rows.len().max(1));
    let folds = stratified_folds(&rows, y, k, n_folds, &mut rng);

    let mut scores = Scores::default();

    for test in folds.iter().filter(|f| !f.is_empty()) {
        let train: Vec<usize> = rows.iter().copied().filter(|r| test.binary_search(r).is_err()).collect();
        if train.is_empty() {
            continue;
        }

        let gains: Vec<f64> = all_features
            .iter()
            .map(|&j| split_gain(x, y, k, &train, j))
            .collect();
        let worst_attr = gains
            .iter()
            .enumerate()
            .fold((0, f64::INFINITY), |acc, (j, &g)| if g < acc.1 { (j, g) } else { acc })
            .0;
        let mean_gain = gains.iter().sum::<f64>() / gains.len() as f64;
        let elite: Vec<usize> = all_features
            .iter()
            .copied()
            .filter(|&j| gains[j] >= mean_gain)
            .collect();

        let best = stump(x, y, k, &train, &all_features);
        scores.best_node.push(accuracy(test, y, |r| best.predict(x.row(r))));

        let worst = stump(x, y, k, &train, &[worst_attr]);
        scores.worst_node.push(accuracy(test, y, |r| worst.predict(x.row(r))));

        let random = stump(x, y, k, &train, &[random_attr]);
        scores.random_node.push(accuracy(test, y, |r| random.predict(x.row(r))));

        scores.one_nn.push(accuracy(test, y, |r| nearest_neighbour(x, y, &train, &all_features, r)));
        scores.elite_nn.push(accuracy(test, y, |r| nearest_neighbour(x, y, &train, &elite, r)));

        let nb = NaiveBayes::fit(x, y, k, &train);
        scores.naive_bayes.push(accuracy(test, y, |r| nb.predict(x, r)));
    }

    out.summarized("best_node", &scores.best_node);
    out.summarized("elite_nn", &scores.elite_nn);
    out.summarized("naive_bayes", &scores.naive_bayes);
    out.summarized("one_nn", &scores.one_nn);
    out.summarized("random_node", &scores.random_node);
    out.summarized("worst_node", &scores.worst_node);
}
