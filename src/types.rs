//! Core data types for detection match records and metric results.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{CocoMetricError, Result};

/// Per-image, per-class matching result produced by an external box matcher.
///
/// The matcher decides, for every configured IoU threshold, which detections
/// hit a ground-truth box and which boxes/detections are excluded from
/// scoring. This library only consumes those decisions; it never sees the
/// boxes themselves.
///
/// Field names keep the wire format of the matcher output (`dtMatches`,
/// `gtMatches`, ...), so records serialize/deserialize unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Whether detection `d` matched a ground-truth box at threshold `t`,
    /// shape `[T][D]`.
    #[serde(rename = "dtMatches")]
    pub dt_matches: Vec<Vec<bool>>,
    /// Whether ground-truth box `g` was matched at threshold `t`,
    /// shape `[T][G]`.
    #[serde(rename = "gtMatches")]
    pub gt_matches: Vec<Vec<bool>>,
    /// Confidence score per detection, shape `[D]`.
    #[serde(rename = "dtScores")]
    pub dt_scores: Vec<f64>,
    /// Whether detection `d` is excluded from scoring at threshold `t`
    /// (e.g. it matched an ignored ground-truth region), shape `[T][D]`.
    #[serde(rename = "dtIgnore")]
    pub dt_ignore: Vec<Vec<bool>>,
    /// Whether ground-truth box `g` is excluded from the ground-truth count,
    /// shape `[G]`.
    #[serde(rename = "gtIgnore")]
    pub gt_ignore: Vec<bool>,
}

impl MatchRecord {
    /// Number of detections in this record.
    pub fn num_detections(&self) -> usize {
        self.dt_scores.len()
    }

    /// Number of ground-truth boxes in this record (ignored ones included).
    pub fn num_ground_truth(&self) -> usize {
        self.gt_ignore.len()
    }

    /// Number of ground-truth boxes that actually count towards recall.
    pub fn num_valid_ground_truth(&self) -> usize {
        self.gt_ignore.iter().filter(|&&ignored| !ignored).count()
    }

    /// Validate the record against the configured number of IoU thresholds.
    ///
    /// The threshold axis must match `num_iou` exactly; every row of
    /// `dt_matches` and `dt_ignore` must have one column per detection score.
    ///
    /// # Errors
    ///
    /// Returns [`CocoMetricError::ShapeMismatch`] for a wrong threshold axis
    /// and [`CocoMetricError::InvalidRecord`] for ragged detection columns.
    pub fn validate(&self, num_iou: usize) -> Result<()> {
        if self.dt_matches.len() != num_iou || self.dt_ignore.len() != num_iou {
            return Err(CocoMetricError::ShapeMismatch(format!(
                "expected {} IoU threshold rows, got dtMatches={} dtIgnore={}",
                num_iou,
                self.dt_matches.len(),
                self.dt_ignore.len()
            )));
        }

        let num_dt = self.dt_scores.len();
        for (t, row) in self.dt_matches.iter().enumerate() {
            if row.len() != num_dt {
                return Err(CocoMetricError::InvalidRecord(format!(
                    "dtMatches row {} has {} columns, expected {} (one per score)",
                    t,
                    row.len(),
                    num_dt
                )));
            }
        }
        for (t, row) in self.dt_ignore.iter().enumerate() {
            if row.len() != num_dt {
                return Err(CocoMetricError::InvalidRecord(format!(
                    "dtIgnore row {} has {} columns, expected {} (one per score)",
                    t,
                    row.len(),
                    num_dt
                )));
            }
        }

        Ok(())
    }
}

/// Match records for one image, keyed by class index.
///
/// A class missing from the map means the image has no detections and no
/// ground truth for that class.
pub type ImageResults = HashMap<usize, MatchRecord>;

/// A single scalar metric: mean and standard deviation over samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub mean: f64,
    pub std: f64,
}

impl MetricValue {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    /// Sentinel value reported when no valid entries exist for a selection.
    pub fn sentinel() -> Self {
        Self {
            mean: -1.0,
            std: -1.0,
        }
    }
}

/// Flat mapping of metric name to scalar result, ordered by name.
pub type MetricSummary = BTreeMap<String, MetricValue>;

/// Reserved slot for raw curve outputs (per-metric arrays, e.g. for
/// plotting). Currently always `None`.
pub type MetricCurves = BTreeMap<String, Vec<f64>>;
