//! CART Decision Tree (Gini impurity) used by model-based and landmarking metafeatures

use ndarray::{ArrayView1, ArrayView2};

/// A node of a fitted tree
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// Internal node: rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        depth: usize,
        n_samples: usize,
    },
    /// Terminal node predicting `class`
    Leaf {
        class: usize,
        depth: usize,
        n_samples: usize,
    },
}

impl Node {
    pub fn depth(&self) -> usize {
        match self {
            Node::Split { depth, .. } | Node::Leaf { depth, .. } => *depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Growth limits
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TreeParams {
    /// Maximum depth (root has depth 0); None grows until pure
    pub max_depth: Option<usize>,
}

/// Fitted classification tree stored as a flat node arena (root at index 0)
#[derive(Debug, Clone)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    decrease: f64,
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Midpoint of two adjacent sorted values, falling back to `value` when the
/// midpoint rounds onto `next`, overflows or is NaN.
///
/// The result always satisfies `value <= t < next`, so both children are non-empty.
fn threshold_between(value: f64, next: f64) -> f64 {
    let t = value / 2.0 + next / 2.0;
    if !t.is_finite() || t < value || t >= next {
        value
    } else {
        t
    }
}

fn majority(counts: &[usize]) -> usize {
    counts
        .iter()
        .enumerate()
        .fold((0, 0), |best, (class, &c)| if c > best.1 { (class, c) } else { best })
        .0
}

struct Builder<'x, 'a> {
    x: ArrayView2<'x, f64>,
    y: &'a [usize],
    n_classes: usize,
    features: &'a [usize],
    params: TreeParams,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl Builder<'_, '_> {
    fn class_counts(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &r in rows {
            counts[self.y[r]] += 1;
        }
        counts
    }

    /// Best threshold over the allowed features, by weighted Gini decrease
    fn best_split(&self, rows: &[usize], parent: &[usize]) -> Option<SplitCandidate> {
        let n = rows.len();
        let parent_impurity = gini(parent, n) * n as f64;
        let mut best: Option<SplitCandidate> = None;

        for &feature in self.features {
            let mut ordered: Vec<(f64, usize)> = rows
                .iter()
                .map(|&r| (self.x[[r, feature]], self.y[r]))
                .filter(|(v, _)| !v.is_nan())
                .collect();
            ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Missing values always fall to the right branch
            let mut right = parent.to_vec();
            let mut left = vec![0; self.n_classes];
            for (i, &(value, class)) in ordered.iter().enumerate() {
                left[class] += 1;
                right[class] -= 1;
                let Some(&(next, _)) = ordered.get(i + 1) else {
                    break;
                };
                if next <= value {
                    continue;
                }
                let n_left = i + 1;
                let n_right = n - n_left;
                let impurity =
                    gini(&left, n_left) * n_left as f64 + gini(&right, n_right) * n_right as f64;
                let decrease = parent_impurity - impurity;
                if decrease > 1e-12 && best.as_ref().map_or(true, |b| decrease > b.decrease) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: threshold_between(value, next),
                        decrease,
                    });
                }
            }
        }
        best
    }

    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let counts = self.class_counts(&rows);
        let idx = self.nodes.len();
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);

        let split = if pure || depth_reached || rows.len() < 2 {
            None
        } else {
            self.best_split(&rows, &counts)
        };

        let n_samples = rows.len();
        let leaf = Node::Leaf {
            class: majority(&counts),
            depth,
            n_samples,
        };
        let Some(split) = split else {
            self.nodes.push(leaf);
            return idx;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.x[[r, split.feature]] <= split.threshold);
        if left_rows.is_empty() || right_rows.is_empty() {
            self.nodes.push(leaf);
            return idx;
        }

        self.importances[split.feature] += split.decrease;
        // Reserve the slot, children are filled in below
        self.nodes.push(leaf);
        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);

        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            depth,
            n_samples,
        };
        idx
    }
}

impl DecisionTree {
    /// Fit on the given rows, restricting splits to `features`
    pub fn fit(
        x: ArrayView2<f64>,
        y: &[usize],
        n_classes: usize,
        rows: &[usize],
        features: &[usize],
        params: TreeParams,
    ) -> Self {
        let mut builder = Builder {
            x,
            y,
            n_classes: n_classes.max(1),
            features,
            params,
            nodes: Vec::new(),
            importances: vec![0.0; x.ncols()],
        };
        builder.grow(rows.to_vec(), 0);

        let total: f64 = builder.importances.iter().sum();
        if total > 0.0 {
            for imp in &mut builder.importances {
                *imp /= total;
            }
        }

        Self {
            nodes: builder.nodes,
            importances: builder.importances,
        }
    }

    /// Fit on every row and every feature
    pub fn fit_all(x: ArrayView2<f64>, y: &[usize], n_classes: usize, params: TreeParams) -> Self {
        let rows: Vec<usize> = (0..x.nrows()).collect();
        let features: Vec<usize> = (0..x.ncols()).collect();
        Self::fit(x, y, n_classes, &rows, &features, params)
    }

    /// Predict the class of one sample
    pub fn predict(&self, sample: ArrayView1<f64>) -> usize {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { class, .. } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Normalized Gini importance per feature (all zero for a single leaf)
    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn splits(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_leaf())
    }
}

/// Weighted Gini decrease of the best single split on `feature`.
///
/// Normalized by the number of rows; 0 when no split helps.
pub(crate) fn split_gain(x: ArrayView2<f64>, y: &[usize], n_classes: usize, rows: &[usize], feature: usize) -> f64 {
    let features = [feature];
    let builder = Builder {
        x,
        y,
        n_classes: n_classes.max(1),
        features: &features,
        params: TreeParams { max_depth: Some(1) },
        nodes: Vec::new(),
        importances: Vec::new(),
    };
    let counts = builder.class_counts(rows);
    builder
        .best_split(rows, &counts)
        .map_or(0.0, |s| s.decrease / rows.len().max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_separable_data_gives_one_split() {
        let x = array![[1.0], [2.0], [10.0], [11.0]];
        let y = [0, 0, 1, 1];
        let tree = DecisionTree::fit_all(x.view(), &y, 2, TreeParams::default());

        assert_eq!(tree.splits().count(), 1);
        assert_eq!(tree.leaves().count(), 2);
        assert_eq!(tree.predict(array![0.0].view()), 0);
        assert_eq!(tree.predict(array![12.0].view()), 1);
        assert_eq!(tree.importances(), &[1.0]);
    }

    #[test]
    fn test_pure_labels_give_single_leaf() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let tree = DecisionTree::fit_all(x.view(), &[1, 1], 2, TreeParams::default());
        assert_eq!(tree.nodes().len(), 1);
        assert_eq!(tree.predict(array![0.0, 0.0].view()), 1);
        assert_eq!(tree.importances(), &[0.0, 0.0]);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = [0, 1, 0, 1, 0, 1];
        let tree = DecisionTree::fit_all(x.view(), &y, 2, TreeParams { max_depth: Some(1) });
        assert!(tree.nodes().iter().all(|n| n.depth() <= 1));
        let full = DecisionTree::fit_all(x.view(), &y, 2, TreeParams::default());
        assert_eq!(full.leaves().count(), 6);
    }

    #[test]
    fn test_picks_informative_feature() {
        let x = array![[5.0, 1.0], [1.0, 2.0], [4.0, 10.0], [2.0, 11.0]];
        let y = [0, 0, 1, 1];
        let tree = DecisionTree::fit_all(x.view(), &y, 2, TreeParams { max_depth: Some(1) });
        match &tree.nodes()[0] {
            Node::Split { feature, .. } => assert_eq!(*feature, 1),
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn test_split_gain() {
        let x = array![[5.0, 1.0], [1.0, 2.0], [4.0, 10.0], [2.0, 11.0]];
        let y = [0, 0, 1, 1];
        let rows = [0, 1, 2, 3];
        assert!((split_gain(x.view(), &y, 2, &rows, 1) - 0.5).abs() < 1e-12);
        assert!(split_gain(x.view(), &y, 2, &rows, 0) < 0.5);
    }

    #[test]
    fn test_adjacent_floats_split_terminates() {
        let a = 1.0000000000000002_f64;
        let b = 1.0000000000000004_f64;
        let x = array![[a], [b]];
        let tree = DecisionTree::fit_all(x.view(), &[0, 1], 2, TreeParams::default());
        assert_eq!(tree.leaves().count(), 2);
        assert_eq!(tree.predict(array![a].view()), 0);
        assert_eq!(tree.predict(array![b].view()), 1);
    }

    #[test]
    fn test_huge_values_split_terminates() {
        let x = array![[1e308], [1.5e308]];
        let tree = DecisionTree::fit_all(x.view(), &[0, 1], 2, TreeParams::default());
        assert_eq!(tree.leaves().count(), 2);
        assert_eq!(tree.predict(array![1e308].view()), 0);
        assert_eq!(tree.predict(array![1.5e308].view()), 1);
    }

    #[test]
    fn test_infinite_values_split_terminates() {
        let x = array![[f64::NEG_INFINITY], [f64::INFINITY], [0.0]];
        let tree = DecisionTree::fit_all(x.view(), &[0, 1, 0], 2, TreeParams::default());
        assert_eq!(tree.predict(array![f64::INFINITY].view()), 1);
        assert_eq!(tree.predict(array![f64::NEG_INFINITY].view()), 0);
    }

    #[test]
    fn test_threshold_between_stays_in_range() {
        let cases = [
            (1.0, 2.0),
            (1.0000000000000002, 1.0000000000000004),
            (1e308, 1.5e308),
            (f64::NEG_INFINITY, f64::INFINITY),
            (f64::NEG_INFINITY, -1.0),
            (5.0, f64::INFINITY),
            (5e-324, 1e-323),
        ];
        for (value, next) in cases {
            let t = threshold_between(value, next);
            assert!(value <= t && t < next, "{value} {next} -> {t}");
        }
        assert_eq!(threshold_between(1.0, 2.0), 1.5);
    }
}
