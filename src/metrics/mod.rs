//! Metric computation modules: per-threshold curves and AP/AR reductions.

pub mod ap;
pub mod ar;
pub mod precision_recall;

pub use ap::select_ap;
pub use ar::select_ar;
pub use precision_recall::{precision_recall_curve, smooth_precision, ThresholdCurve};
