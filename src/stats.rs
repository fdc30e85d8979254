//! Dataset-level statistics arrays and bookkeeping counters.
//!
//! The precision/recall/score tensors are stored as flat `Vec<f64>` with
//! explicit index helpers. Slots start at the `-1.0` sentinel ("not
//! computed"): a class absent from an image, or an image without real ground
//! truth for a class, leaves its slots untouched. Downstream reductions
//! treat `value > -1.0` as the validity predicate.

use serde::{Deserialize, Serialize};

/// Dense per-dataset statistics, allocated fresh for every compute call.
///
/// Axis order:
/// - `recall`: `[sample, iou_threshold, class, max_detection_cap]`
/// - `precision`, `scores`:
///   `[sample, iou_threshold, recall_threshold, class, max_detection_cap]`
#[derive(Debug, Clone)]
pub struct DatasetStatistics {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub scores: Vec<f64>,
    pub num_samples: usize,
    pub num_iou: usize,
    pub num_recall: usize,
    pub num_classes: usize,
    pub num_max_det: usize,
}

impl DatasetStatistics {
    /// Allocate sentinel-filled arrays for the given dimensions.
    pub fn new(
        num_samples: usize,
        num_iou: usize,
        num_recall: usize,
        num_classes: usize,
        num_max_det: usize,
    ) -> Self {
        let recall_len = num_samples * num_iou * num_classes * num_max_det;
        let precision_len = recall_len * num_recall;
        Self {
            precision: vec![-1.0; precision_len],
            recall: vec![-1.0; recall_len],
            scores: vec![-1.0; precision_len],
            num_samples,
            num_iou,
            num_recall,
            num_classes,
            num_max_det,
        }
    }

    /// Flat index into `recall`.
    #[inline]
    pub fn recall_idx(&self, sample: usize, t: usize, cls: usize, m: usize) -> usize {
        ((sample * self.num_iou + t) * self.num_classes + cls) * self.num_max_det + m
    }

    /// Flat index into `precision` / `scores`.
    #[inline]
    pub fn precision_idx(&self, sample: usize, t: usize, r: usize, cls: usize, m: usize) -> usize {
        (((sample * self.num_iou + t) * self.num_recall + r) * self.num_classes + cls)
            * self.num_max_det
            + m
    }
}

/// Counters collected while walking the per-image match records.
///
/// Tracks how much of the dataset actually contributed signal, for logging
/// at the end of a verbose run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationCounts {
    /// Per-image, per-class, per-cap records that produced curve entries.
    pub records_evaluated: usize,

    /// Records skipped because every ground-truth box was ignored.
    pub skipped_no_ground_truth: usize,

    /// (class, cap) combinations with no record in any image.
    pub classes_without_results: usize,
}

impl EvaluationCounts {
    /// Create a new `EvaluationCounts` with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_evaluated(&mut self) {
        self.records_evaluated += 1;
    }

    pub fn skip_no_ground_truth(&mut self) {
        self.skipped_no_ground_truth += 1;
    }

    pub fn class_without_results(&mut self) {
        self.classes_without_results += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_fill() {
        let stats = DatasetStatistics::new(2, 3, 101, 4, 1);
        assert_eq!(stats.recall.len(), 2 * 3 * 4);
        assert_eq!(stats.precision.len(), 2 * 3 * 101 * 4);
        assert!(stats.recall.iter().all(|&v| v == -1.0));
        assert!(stats.precision.iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_index_layout_is_contiguous() {
        let stats = DatasetStatistics::new(2, 3, 5, 4, 2);
        // last axis is fastest moving
        assert_eq!(
            stats.recall_idx(0, 0, 0, 1),
            stats.recall_idx(0, 0, 0, 0) + 1
        );
        assert_eq!(
            stats.precision_idx(1, 2, 4, 3, 1),
            stats.precision.len() - 1
        );
        assert_eq!(stats.recall_idx(1, 2, 3, 1), stats.recall.len() - 1);
    }

    #[test]
    fn test_counts() {
        let mut counts = EvaluationCounts::new();
        counts.add_evaluated();
        counts.add_evaluated();
        counts.skip_no_ground_truth();
        counts.class_without_results();
        assert_eq!(counts.records_evaluated, 2);
        assert_eq!(counts.skipped_no_ground_truth, 1);
        assert_eq!(counts.classes_without_results, 1);
    }
}
