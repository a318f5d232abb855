use crate::path::ClassPath;

/// Running sums of hierarchical path overlap between predictions and truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapAccumulator {
    pub sum_intersection: usize,
    pub sum_pred_depth: usize,
    pub sum_true_depth: usize,
    pub sum_min_depth: usize,
    pub instances: usize,
}

/// Contribution of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub intersection: usize,
    pub pred_depth: usize,
    pub true_depth: usize,
}

impl Overlap {
    pub fn between(predicted: &ClassPath, truth: &ClassPath) -> Self {
        Overlap {
            intersection: predicted.common_prefix_len(truth),
            pred_depth: predicted.depth(),
            true_depth: truth.depth(),
        }
    }
}

impl OverlapAccumulator {
    pub fn add(&mut self, overlap: Overlap) {
        self.sum_intersection += overlap.intersection;
        self.sum_pred_depth += overlap.pred_depth;
        self.sum_true_depth += overlap.true_depth;
        self.sum_min_depth += overlap.pred_depth.min(overlap.true_depth);
        self.instances += 1;
    }

    pub fn metrics(&self) -> HierarchicalMetrics {
        let precision = ratio(self.sum_intersection, self.sum_pred_depth);
        let recall = ratio(self.sum_intersection, self.sum_true_depth);
        let min_depth_precision = ratio(self.sum_intersection, self.sum_min_depth);

        HierarchicalMetrics {
            precision,
            recall,
            f_measure: f_measure(precision, recall),
            min_depth_precision,
            min_depth_f_measure: f_measure(min_depth_precision, recall),
        }
    }
}

/// Hierarchical precision, recall and F.
///
/// `precision` and `recall` are fractions in `[0, 1]`; `f_measure` is scaled
/// to `[0, 100]`. The `min_depth_*` pair divides the overlap by the shallower
/// of the two paths instead of the predicted depth and is kept for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HierarchicalMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f_measure: f64,
    pub min_depth_precision: f64,
    pub min_depth_f_measure: f64,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        100.0 * 2.0 * precision * recall / (precision + recall)
    }
}
