//! Utilities for working with Polars DataFrames.
//!
//! Helpers for turning a metric summary into a tabular report that can be
//! printed, joined against other runs, or written out by downstream tooling.

use polars::prelude::*;

use crate::error::Result;
use crate::types::MetricSummary;

/// Convert a metric summary into a three-column DataFrame.
///
/// Columns are `metric`, `mean`, and `std`, in the summary's (name-sorted)
/// order.
///
/// # Example
///
/// ```
/// use coco_metric::polars_utils::summary_to_dataframe;
/// use coco_metric::types::{MetricSummary, MetricValue};
///
/// let mut summary = MetricSummary::new();
/// summary.insert("AP_IoU_0.50_MaxDet_40".to_string(), MetricValue::new(0.7, 0.1));
/// let df = summary_to_dataframe(&summary).unwrap();
/// assert_eq!(df.shape(), (1, 3));
/// ```
pub fn summary_to_dataframe(summary: &MetricSummary) -> Result<DataFrame> {
    let names: Vec<&str> = summary.keys().map(|k| k.as_str()).collect();
    let means: Vec<f64> = summary.values().map(|v| v.mean).collect();
    let stds: Vec<f64> = summary.values().map(|v| v.std).collect();

    let df = DataFrame::new(vec![
        Series::new("metric", names),
        Series::new("mean", means),
        Series::new("std", stds),
    ])?;

    Ok(df)
}

/// Validate that a DataFrame contains all required columns.
pub fn validate_columns(df: &DataFrame, required_columns: &[&str]) -> bool {
    let column_names = df.get_column_names();
    required_columns
        .iter()
        .all(|col| column_names.iter().any(|c| c == col))
}
