//! General Metafeatures: dataset shape and class balance

use super::{Collector, FitData};
use crate::statistics::ColumnStatistics;

/// Every attribute read from a numeric matrix is numeric
const NR_CAT: usize = 0;

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        f64::NAN
    } else {
        num as f64 / den as f64
    }
}

pub(crate) fn compute(data: &FitData, out: &mut Collector) {
    let nr_inst = data.n_rows();
    let nr_attr = data.n_columns();
    let nr_num = nr_attr - NR_CAT;

    let nr_bin = (0..nr_attr)
        .filter(|&j| ColumnStatistics::compute(&data.finite_column(j)).distinct == 2)
        .count();

    out.scalar("nr_inst", nr_inst);
    out.scalar("nr_attr", nr_attr);
    out.scalar("nr_num", nr_num);
    out.scalar("nr_cat", NR_CAT);
    out.scalar("nr_bin", nr_bin);
    out.scalar("attr_to_inst", ratio(nr_attr, nr_inst));
    out.scalar("inst_to_attr", ratio(nr_inst, nr_attr));
    out.scalar("cat_to_num", ratio(NR_CAT, nr_num));
    out.scalar("num_to_cat", ratio(nr_num, NR_CAT));

    if let Some(target) = &data.target {
        let freq: Vec<f64> = target
            .class_counts()
            .iter()
            .map(|&c| ratio(c, nr_inst))
            .collect();
        out.scalar("nr_class", target.n_classes);
        out.summarized("freq_class", &freq);
    }
}
