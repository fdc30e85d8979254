//! The COCO metric engine: configuration, statistics, and AP/AR summaries.

use std::time::Instant;

use crate::error::{CocoMetricError, Result};
use crate::metrics::ap::select_ap;
use crate::metrics::ar::select_ar;
use crate::metrics::precision_recall::precision_recall_curve;
use crate::stats::{DatasetStatistics, EvaluationCounts};
use crate::thresholds::{arange, exact_positions, linspace_from_step, recall_thresholds, union_sorted};
use crate::types::{ImageResults, MetricCurves, MetricSummary};

/// COCO-style mAP/mAR computation over externally matched detections.
///
/// The engine owns the immutable evaluation configuration: class names,
/// the IoU threshold grid, the fixed recall grid, and the max-detection
/// caps. Metrics computed by [`compute`](CocoMetric::compute):
///
/// - mAP over each configured IoU range at the largest max-detection cap
/// - AP at each flat-list IoU threshold at the largest cap
/// - mAR over each IoU range at every max-detection cap
/// - AR at each flat-list IoU threshold at the largest cap
/// - per-class variants of all of the above when `per_class` is set
///
/// Construction is fallible; every computed engine is internally consistent
/// and can be shared freely across threads for read-only evaluation.
#[derive(Debug, Clone)]
pub struct CocoMetric {
    classes: Vec<String>,
    iou_ranges: Vec<(f64, f64, f64)>,
    iou_thresholds: Vec<f64>,
    iou_list_idx: Vec<usize>,
    iou_range_idxs: Vec<Vec<usize>>,
    recall_thresholds: Vec<f64>,
    max_detections: Vec<usize>,
    per_class: bool,
    verbose: bool,
}

impl CocoMetric {
    /// Create a new engine.
    ///
    /// # Arguments
    ///
    /// * `classes` - Class names; position is the class id used in
    ///   [`ImageResults`] maps
    /// * `iou_list` - `(start, stop, step)` for the standalone AP/AR
    ///   thresholds, endpoint exclusive
    /// * `iou_ranges` - `(start, stop, step)` per mAP/mAR range, endpoint
    ///   inclusive
    /// * `max_detections` - Detection-count caps, must be non-empty; the
    ///   last cap is the one AP reporting uses
    /// * `per_class` - Additionally report every metric per class
    /// * `verbose` - Log progress and timing at info level
    ///
    /// # Errors
    ///
    /// Returns [`CocoMetricError::Configuration`] when the threshold grids
    /// collapse to nothing, when `max_detections` is empty, or when a
    /// flat-list value has no bit-exact position in the merged grid.
    pub fn new(
        classes: Vec<String>,
        iou_list: (f64, f64, f64),
        iou_ranges: Vec<(f64, f64, f64)>,
        max_detections: Vec<usize>,
        per_class: bool,
        verbose: bool,
    ) -> Result<Self> {
        if max_detections.is_empty() {
            return Err(CocoMetricError::Configuration(
                "at least one max-detection cap is required".to_string(),
            ));
        }

        let flat = arange(iou_list.0, iou_list.1, iou_list.2);
        let mut iou_thresholds = flat.clone();
        for &(lo, hi, step) in &iou_ranges {
            iou_thresholds = union_sorted(&iou_thresholds, &linspace_from_step(lo, hi, step));
        }
        if iou_thresholds.is_empty() {
            return Err(CocoMetricError::Configuration(
                "IoU list and ranges produced no thresholds".to_string(),
            ));
        }

        // guards against float range construction producing a mismatched set
        let iou_list_idx = exact_positions(&flat, &iou_thresholds)?;
        let iou_range_idxs = iou_ranges
            .iter()
            .map(|&(lo, hi, step)| {
                exact_positions(&linspace_from_step(lo, hi, step), &iou_thresholds)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            classes,
            iou_ranges,
            iou_thresholds,
            iou_list_idx,
            iou_range_idxs,
            recall_thresholds: recall_thresholds(),
            max_detections,
            per_class,
            verbose,
        })
    }

    /// Engine with the reference default configuration: AP thresholds
    /// 0.05..1.0 step 0.05, mAP ranges (0.05, 0.5, 0.05) and
    /// (0.5, 0.95, 0.05), a single cap of 40 detections, per-class
    /// reporting on.
    pub fn with_defaults(classes: Vec<String>) -> Result<Self> {
        Self::new(
            classes,
            (0.05, 1.0, 0.05),
            vec![(0.05, 0.5, 0.05), (0.5, 0.95, 0.05)],
            vec![40],
            true,
            true,
        )
    }

    /// Class names, in class-id order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The merged IoU threshold grid the matcher must evaluate against.
    ///
    /// The first dimension of every record's `dtMatches`/`dtIgnore` must
    /// have exactly this length.
    pub fn iou_thresholds(&self) -> &[f64] {
        &self.iou_thresholds
    }

    /// The fixed 101-point recall grid.
    pub fn recall_thresholds(&self) -> &[f64] {
        &self.recall_thresholds
    }

    /// Configured max-detection caps.
    pub fn max_detections(&self) -> &[usize] {
        &self.max_detections
    }

    /// Compute all configured metrics for a dataset of match records.
    ///
    /// `results` holds one [`ImageResults`] map per image; classes absent
    /// from a map contribute no detections and no ground truth for that
    /// image. The second tuple slot is reserved for raw curve outputs and is
    /// currently always `None`.
    pub fn compute(
        &self,
        results: &[ImageResults],
    ) -> Result<(MetricSummary, Option<MetricCurves>)> {
        let tic = Instant::now();
        if self.verbose {
            log::info!("Start COCO metric computation...");
        }

        let stats = self.compute_statistics(results)?;
        if self.verbose {
            log::info!(
                "Statistics for COCO metrics finished (t={:.2}s).",
                tic.elapsed().as_secs_f64()
            );
        }

        let mut summary = self.compute_ap(&stats);
        summary.extend(self.compute_ar(&stats));

        if self.verbose {
            log::info!(
                "COCO metrics computed in t={:.2}s.",
                tic.elapsed().as_secs_f64()
            );
        }
        Ok((summary, None))
    }

    /// Build the raw recall/precision/score arrays for a dataset.
    ///
    /// Walks every class and max-detection cap, gathers the records of
    /// images containing the class, and fills one curve per IoU threshold
    /// row. Slots of skipped combinations keep the `-1` sentinel.
    pub fn compute_statistics(&self, results: &[ImageResults]) -> Result<DatasetStatistics> {
        let num_iou = self.iou_thresholds.len();
        let mut stats = DatasetStatistics::new(
            results.len(),
            num_iou,
            self.recall_thresholds.len(),
            self.classes.len(),
            self.max_detections.len(),
        );
        let mut counts = EvaluationCounts::new();

        for (cls_idx, cls_name) in self.classes.iter().enumerate() {
            for (max_det_idx, &max_det) in self.max_detections.iter().enumerate() {
                let gathered: Vec<_> = results.iter().filter_map(|r| r.get(&cls_idx)).collect();
                if gathered.is_empty() {
                    log::warn!("no results found for coco metric for class {cls_name}");
                    counts.class_without_results();
                    continue;
                }

                for (slot, record) in gathered.iter().enumerate() {
                    record.validate(num_iou)?;

                    // stable descending sort keeps tie-breaking reproducible
                    let cap = max_det.min(record.dt_scores.len());
                    let mut order: Vec<usize> = (0..cap).collect();
                    order.sort_by(|&a, &b| {
                        record.dt_scores[b]
                            .partial_cmp(&record.dt_scores[a])
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });
                    let scores_sorted: Vec<f64> =
                        order.iter().map(|&i| record.dt_scores[i]).collect();

                    let num_gt = record.num_valid_ground_truth();
                    if num_gt == 0 {
                        log::warn!("no gt found for coco metric for class {cls_name}");
                        counts.skip_no_ground_truth();
                        continue;
                    }

                    for t in 0..num_iou {
                        let mut tp = Vec::with_capacity(cap);
                        let mut fp = Vec::with_capacity(cap);
                        let mut tp_run = 0.0;
                        let mut fp_run = 0.0;
                        for &i in &order {
                            let matched = record.dt_matches[t][i];
                            let ignored = record.dt_ignore[t][i];
                            // ignored detections count towards neither sum
                            if matched && !ignored {
                                tp_run += 1.0;
                            } else if !matched && !ignored {
                                fp_run += 1.0;
                            }
                            tp.push(tp_run);
                            fp.push(fp_run);
                        }

                        let curve = precision_recall_curve(
                            &tp,
                            &fp,
                            &scores_sorted,
                            &self.recall_thresholds,
                            num_gt,
                        );

                        let ridx = stats.recall_idx(slot, t, cls_idx, max_det_idx);
                        stats.recall[ridx] = curve.recall;
                        for (r, (&p, &s)) in
                            curve.precision.iter().zip(curve.scores.iter()).enumerate()
                        {
                            let pidx = stats.precision_idx(slot, t, r, cls_idx, max_det_idx);
                            stats.precision[pidx] = p;
                            stats.scores[pidx] = s;
                        }
                    }
                    counts.add_evaluated();
                }
            }
        }

        if self.verbose {
            log::info!(
                "evaluated {} records ({} zero-gt skips, {} class/cap combinations without results)",
                counts.records_evaluated,
                counts.skipped_no_ground_truth,
                counts.classes_without_results
            );
        }
        Ok(stats)
    }

    /// AP entries: one per range (mAP), one per flat-list threshold, with
    /// per-class variants when enabled.
    pub fn compute_ap(&self, stats: &DatasetStatistics) -> MetricSummary {
        let mut results = MetricSummary::new();
        let last_idx = self.max_detections.len() - 1;
        let last_cap = self.max_detections[last_idx];

        for (i, &(lo, hi, step)) in self.iou_ranges.iter().enumerate() {
            let key = format!("mAP_IoU_{lo:.2}_{hi:.2}_{step:.2}_MaxDet_{last_cap}");
            results.insert(key, select_ap(stats, &self.iou_range_idxs[i], None, last_idx));

            if self.per_class {
                for (cls_idx, cls_name) in self.classes.iter().enumerate() {
                    let key = format!(
                        "{cls_name}_mAP_IoU_{lo:.2}_{hi:.2}_{step:.2}_MaxDet_{last_cap}"
                    );
                    results.insert(
                        key,
                        select_ap(stats, &self.iou_range_idxs[i], Some(cls_idx), last_idx),
                    );
                }
            }
        }

        for &idx in &self.iou_list_idx {
            let thr = self.iou_thresholds[idx];
            let key = format!("AP_IoU_{thr:.2}_MaxDet_{last_cap}");
            results.insert(key, select_ap(stats, &[idx], None, last_idx));

            if self.per_class {
                for (cls_idx, cls_name) in self.classes.iter().enumerate() {
                    let key = format!("{cls_name}_AP_IoU_{thr:.2}_MaxDet_{last_cap}");
                    results.insert(key, select_ap(stats, &[idx], Some(cls_idx), last_idx));
                }
            }
        }
        results
    }

    /// AR entries: one per (range, cap) pair (mAR), one per flat-list
    /// threshold at the largest cap, with per-class variants when enabled.
    pub fn compute_ar(&self, stats: &DatasetStatistics) -> MetricSummary {
        let mut results = MetricSummary::new();
        let last_idx = self.max_detections.len() - 1;
        let last_cap = self.max_detections[last_idx];

        for (max_det_idx, &max_det) in self.max_detections.iter().enumerate() {
            for (i, &(lo, hi, step)) in self.iou_ranges.iter().enumerate() {
                let key = format!("mAR_IoU_{lo:.2}_{hi:.2}_{step:.2}_MaxDet_{max_det}");
                results.insert(
                    key,
                    select_ar(stats, &self.iou_range_idxs[i], None, max_det_idx),
                );

                if self.per_class {
                    for (cls_idx, cls_name) in self.classes.iter().enumerate() {
                        let key = format!(
                            "{cls_name}_mAR_IoU_{lo:.2}_{hi:.2}_{step:.2}_MaxDet_{max_det}"
                        );
                        results.insert(
                            key,
                            select_ar(stats, &self.iou_range_idxs[i], Some(cls_idx), max_det_idx),
                        );
                    }
                }
            }
        }

        for &idx in &self.iou_list_idx {
            let thr = self.iou_thresholds[idx];
            let key = format!("AR_IoU_{thr:.2}_MaxDet_{last_cap}");
            results.insert(key, select_ar(stats, &[idx], None, last_idx));

            if self.per_class {
                for (cls_idx, cls_name) in self.classes.iter().enumerate() {
                    let key = format!("{cls_name}_AR_IoU_{thr:.2}_MaxDet_{last_cap}");
                    results.insert(key, select_ar(stats, &[idx], Some(cls_idx), last_idx));
                }
            }
        }
        results
    }
}
