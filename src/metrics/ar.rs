//! Average Recall reduction over the dataset statistics arrays.

use crate::metrics::ap::mean_std;
use crate::stats::DatasetStatistics;
use crate::types::MetricValue;

/// Reduce the recall array to a single AR value.
///
/// Selects the given IoU-threshold indices, optionally a single class, and
/// one max-detection cap. Unlike AP, sentinel `-1` entries ARE filtered:
/// each sample is averaged over its valid entries only, and samples without
/// any valid entry are left out, so images lacking a class do not pull the
/// recall average towards `-1`.
///
/// Returns `(-1, -1)` when no sample has a single valid entry.
pub fn select_ar(
    stats: &DatasetStatistics,
    iou_idx: &[usize],
    cls_idx: Option<usize>,
    max_det_idx: usize,
) -> MetricValue {
    let classes: Vec<usize> = match cls_idx {
        Some(k) => vec![k],
        None => (0..stats.num_classes).collect(),
    };

    let mut sample_means = Vec::with_capacity(stats.num_samples);
    for sample in 0..stats.num_samples {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &t in iou_idx {
            for &k in &classes {
                let value = stats.recall[stats.recall_idx(sample, t, k, max_det_idx)];
                if value > -1.0 {
                    sum += value;
                    count += 1;
                }
            }
        }
        if count > 0 {
            sample_means.push(sum / count as f64);
        }
    }

    if sample_means.is_empty() {
        return MetricValue::sentinel();
    }
    let (mean, std) = mean_std(&sample_means);
    MetricValue::new(mean, std)
}
