//! Threshold grid construction utilities.
//!
//! IoU threshold grids are built the way the reference tooling builds them:
//! the flat list uses `arange` semantics (endpoint exclusive, values are
//! `start + i * step`), ranges use `linspace` semantics (endpoint inclusive,
//! `round((stop - start) / step) + 1` samples). The two grids are merged
//! with exact floating-point deduplication, so a flat-list value and a
//! range value that differ by one ulp remain distinct entries. Index lookups
//! into the merged grid are therefore exact comparisons on purpose: a failed
//! lookup means the grid construction drifted and must be a hard error.

use crate::error::{CocoMetricError, Result};

/// Endpoint-exclusive evenly stepped values: `start + i * step` for
/// `i in 0..ceil((stop - start) / step)`.
///
/// # Example
///
/// ```
/// use coco_metric::thresholds::arange;
///
/// let values = arange(0.0, 0.3, 0.1);
/// assert_eq!(values.len(), 3);
/// assert_eq!(values[0], 0.0);
/// ```
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Endpoint-inclusive evenly spaced values with a step-derived sample count:
/// `round((stop - start) / step) + 1` samples from `start` to `stop`.
///
/// The last sample is forced bit-exact to `stop`.
pub fn linspace_from_step(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop < start {
        return Vec::new();
    }
    let n = ((stop - start) / step).round() as usize + 1;
    linspace(start, stop, n)
}

/// Endpoint-inclusive evenly spaced values with an explicit sample count.
///
/// # Example
///
/// ```
/// use coco_metric::thresholds::linspace;
///
/// let values = linspace(0.0, 1.0, 101);
/// assert_eq!(values.len(), 101);
/// assert_eq!(values[0], 0.0);
/// assert_eq!(values[100], 1.0);
/// ```
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let span = stop - start;
            let mut values: Vec<f64> = (0..n)
                .map(|i| start + span * i as f64 / (n - 1) as f64)
                .collect();
            // endpoint must be exact, not start + span
            values[n - 1] = stop;
            values
        }
    }
}

/// The 101 fixed recall thresholds 0.00, 0.01, ..., 1.00.
pub fn recall_thresholds() -> Vec<f64> {
    linspace(0.0, 1.0, 101)
}

/// Merge two sorted-or-unsorted value lists into one ascending list with
/// exact-equality deduplication.
pub fn union_sorted(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut merged: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    merged.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    merged.dedup();
    merged
}

/// Locate each of `values` inside `within` by exact comparison.
///
/// # Errors
///
/// Returns [`CocoMetricError::Configuration`] if any value has no bit-exact
/// counterpart, rather than silently dropping the threshold.
pub fn exact_positions(values: &[f64], within: &[f64]) -> Result<Vec<usize>> {
    values
        .iter()
        .map(|&v| {
            within.iter().position(|&w| w == v).ok_or_else(|| {
                CocoMetricError::Configuration(format!(
                    "IoU value {v} is not an exact element of the merged threshold grid"
                ))
            })
        })
        .collect()
}
