//! Average Precision reduction over the dataset statistics arrays.

use crate::stats::DatasetStatistics;
use crate::types::MetricValue;

/// Reduce the precision array to a single AP value.
///
/// Selects the given IoU-threshold indices, optionally a single class
/// (`None` keeps all classes), and one max-detection cap, averages each
/// sample over every remaining axis, then reports mean and population
/// standard deviation across samples.
///
/// Sentinel `-1` entries are **not** filtered here: a class that never
/// appears contributes its sentinels to the average. That asymmetry with
/// [`select_ar`](crate::metrics::ar::select_ar) is intentional.
pub fn select_ap(
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
            for r in 0..stats.num_recall {
                for &k in &classes {
                    sum += stats.precision[stats.precision_idx(sample, t, r, k, max_det_idx)];
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

/// Mean and population standard deviation (ddof = 0) of a non-empty slice.
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    (mean, var.sqrt())
}
