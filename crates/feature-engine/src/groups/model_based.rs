//! Model-Based Metafeatures: structure of a decision tree fitted on the whole dataset

use super::{Collector, FitData, GroupParams};
use crate::tree::{DecisionTree, Node, TreeParams};
use std::collections::BTreeMap;

pub(crate) fn compute(data: &FitData, params: &GroupParams, out: &mut Collector) {
    let Some(target) = &data.target else {
        return;
    };

    let tree = DecisionTree::fit_all(
        data.x.view(),
        &target.classes,
        target.n_classes,
        TreeParams {
            max_depth: params.max_tree_depth,
        },
    );

    let n_inst = data.n_rows() as f64;
    let n_attr = data.n_columns() as f64;
    let leaves: Vec<&Node> = tree.leaves().collect();
    let n_nodes = tree.splits().count();

    out.scalar("leaves", leaves.len());
    out.scalar("nodes", n_nodes);
    out.scalar("nodes_per_attr", n_nodes as f64 / n_attr);
    out.scalar("nodes_per_inst", n_nodes as f64 / n_inst);

    // Share of leaves predicting each class
    let mut per_class = vec![0.0; target.n_classes];
    for leaf in &leaves {
        if let Node::Leaf { class, .. } = leaf {
            per_class[*class] += 1.0;
        }
    }
    let leaves_per_class: Vec<f64> = per_class.iter().map(|c| c / leaves.len() as f64).collect();
    out.summarized("leaves_per_class", &leaves_per_class);

    let tree_depth: Vec<f64> = tree.nodes().iter().map(|n| n.depth() as f64).collect();
    out.summarized("tree_depth", &tree_depth);

    let leaves_branch: Vec<f64> = leaves.iter().map(|n| n.depth() as f64).collect();
    out.summarized("leaves_branch", &leaves_branch);

    let leaves_corrob: Vec<f64> = leaves
        .iter()
        .map(|n| match n {
            Node::Leaf { n_samples, .. } => *n_samples as f64 / n_inst,
            Node::Split { .. } => 0.0,
        })
        .collect();
    out.summarized("leaves_corrob", &leaves_corrob);

    let mut per_level: BTreeMap<usize, usize> = BTreeMap::new();
    let mut per_attr: BTreeMap<usize, usize> = BTreeMap::new();
    for node in tree.splits() {
        if let Node::Split { feature, depth, .. } = node {
            *per_level.entry(*depth).or_default() += 1;
            *per_attr.entry(*feature).or_default() += 1;
        }
    }
    let nodes_per_level: Vec<f64> = per_level.values().map(|&c| c as f64).collect();
    out.summarized("nodes_per_level", &nodes_per_level);
    let nodes_repeated: Vec<f64> = per_attr.values().map(|&c| c as f64).collect();
    out.summarized("nodes_repeated", &nodes_repeated);

    // Probability of a random descent reaching each leaf, as -p log2 p
    let tree_shape: Vec<f64> = leaves
        .iter()
        .map(|n| {
            let p = 0.5f64.powi(n.depth() as i32);
            -p * p.log2()
        })
        .collect();
    out.summarized("tree_shape", &tree_shape);

    out.summarized("var_importance", tree.importances());
}
