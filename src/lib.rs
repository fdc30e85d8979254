//! # coco-metric
//!
//! A Rust library for COCO-style object detection evaluation statistics
//! computed from per-image, per-class detection/ground-truth match records.
//!
//! This library provides the accumulation half of a COCO evaluation
//! pipeline:
//! - **mAP** (mean Average Precision) over configurable IoU ranges
//! - **AP** at individual IoU thresholds
//! - **mAR** (mean Average Recall) per IoU range and max-detection cap
//! - **AR** at individual IoU thresholds
//! - per-class variants of all of the above
//!
//! Box matching is *not* performed here: an external matcher decides which
//! detections hit which ground-truth boxes at every IoU threshold and hands
//! over [`MatchRecord`]s. The engine turns those records into
//! precision/recall/score tensors and reduces them to `(mean, std)` summary
//! values.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use coco_metric::evaluator::CocoMetric;
//! use coco_metric::types::MatchRecord;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = CocoMetric::with_defaults(vec!["vessel".to_string()])?;
//!
//! // one image, one class, two detections matched at every threshold
//! let num_iou = engine.iou_thresholds().len();
//! let record = MatchRecord {
//!     dt_matches: vec![vec![true, true]; num_iou],
//!     gt_matches: vec![vec![true, true]; num_iou],
//!     dt_scores: vec![0.9, 0.8],
//!     dt_ignore: vec![vec![false, false]; num_iou],
//!     gt_ignore: vec![false, false],
//! };
//! let mut image = HashMap::new();
//! image.insert(0, record);
//!
//! let (summary, _curves) = engine.compute(&[image])?;
//! let ap = summary.get("AP_IoU_0.50_MaxDet_40").unwrap();
//! assert!((ap.mean - 1.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## Input contract
//!
//! One [`MatchRecord`] per image per class present in that image, with `T`
//! rows (configured IoU thresholds) and `D` columns (detections):
//!
//! ```json
//! {
//!   "dtMatches": [[true, false]],
//!   "gtMatches": [[true, false]],
//!   "dtScores": [0.9, 0.4],
//!   "dtIgnore": [[false, false]],
//!   "gtIgnore": [false, false]
//! }
//! ```

pub mod error;
pub mod evaluator;
pub mod loader;
pub mod metrics;
pub mod polars_utils;
pub mod stats;
pub mod thresholds;
pub mod types;

// Re-export commonly used types and functions
pub use error::{CocoMetricError, Result};
pub use evaluator::CocoMetric;
pub use loader::{load_results_from_file, load_results_from_string};
pub use stats::{DatasetStatistics, EvaluationCounts};
pub use types::{ImageResults, MatchRecord, MetricCurves, MetricSummary, MetricValue};
