//! Error types for the coco-metric library.

use thiserror::Error;

/// Result type for coco-metric operations.
pub type Result<T> = std::result::Result<T, CocoMetricError>;

/// Error types that can occur during metric computation.
#[derive(Error, Debug)]
pub enum CocoMetricError {
    /// Invalid engine configuration, e.g. an IoU list value that cannot be
    /// located inside the merged threshold set.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A match record's IoU-threshold axis disagrees with the engine.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A match record is internally inconsistent (ragged rows, or row widths
    /// disagreeing with the number of detection scores).
    #[error("Invalid match record: {0}")]
    InvalidRecord(String),

    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while building a report DataFrame.
    #[error("DataFrame error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),
}
