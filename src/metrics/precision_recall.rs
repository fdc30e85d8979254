//! Single-IoU-threshold precision/recall curve computation.

/// Curve outputs for one (sample, IoU threshold, class, cap) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCurve {
    /// Overall recall: the last running-recall value, 0.0 without detections.
    pub recall: f64,
    /// Smoothed precision at each fixed recall threshold.
    pub precision: Vec<f64>,
    /// Detection score at each fixed recall threshold.
    pub scores: Vec<f64>,
}

/// Compute recall, the interpolated precision curve, and the score curve for
/// one IoU threshold.
///
/// # Arguments
///
/// * `tp` - Cumulative true positives after the first `i + 1` detections
///   (score descending)
/// * `fp` - Cumulative false positives, same indexing
/// * `scores_sorted` - Detection scores sorted descending
/// * `recall_thresholds` - Fixed recall grid to interpolate onto
/// * `num_gt` - Number of non-ignored ground-truth boxes (must be > 0)
///
/// Precision and score slots default to 0.0: a recall threshold beyond the
/// maximum achieved recall has no operating point and keeps the default.
pub fn precision_recall_curve(
    tp: &[f64],
    fp: &[f64],
    scores_sorted: &[f64],
    recall_thresholds: &[f64],
    num_gt: usize,
) -> ThresholdCurve {
    let num_recall_th = recall_thresholds.len();

    let rc: Vec<f64> = tp.iter().map(|&t| t / num_gt as f64).collect();
    // f64::EPSILON guards the division when both sums are still zero
    let mut pr: Vec<f64> = tp
        .iter()
        .zip(fp.iter())
        .map(|(&t, &f)| t / (f + t + f64::EPSILON))
        .collect();

    let recall = rc.last().copied().unwrap_or(0.0);

    smooth_precision(&mut pr);

    let mut precision = vec![0.0; num_recall_th];
    let mut th_scores = vec![0.0; num_recall_th];

    // left insertion index per recall threshold (nearest-neighbor lookup);
    // indices are non-decreasing, so the first out-of-range one ends the fill
    for (save_idx, &recall_th) in recall_thresholds.iter().enumerate() {
        let idx = rc.partition_point(|&r| r < recall_th);
        if idx >= rc.len() {
            break;
        }
        precision[save_idx] = pr[idx];
        th_scores[save_idx] = scores_sorted[idx];
    }

    ThresholdCurve {
        recall,
        precision,
        scores: th_scores,
    }
}

/// Smooth a running-precision curve into a non-increasing staircase.
///
/// Scans from the last detection backwards and replaces each precision with
/// the maximum of itself and its successor, removing the dips caused by
/// false positives that appear before recall next increases.
///
/// # Example
///
/// ```
/// use coco_metric::metrics::precision_recall::smooth_precision;
///
/// let mut pr = vec![1.0, 0.5, 0.67];
/// smooth_precision(&mut pr);
/// assert_eq!(pr, vec![1.0, 0.67, 0.67]);
/// ```
pub fn smooth_precision(pr: &mut [f64]) {
    for i in (1..pr.len()).rev() {
        if pr[i] > pr[i - 1] {
            pr[i - 1] = pr[i];
        }
    }
}
