//! Error types for the demand-forecast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while loading, aggregating, or forecasting a series.
///
/// Every error is raised synchronously by the stage that detects it and
/// aborts the whole pipeline invocation; no partial results are returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Input observations are empty, contain non-finite values, or carry an
    /// unparsable timestamp.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration or parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An unrecognized reduction function was requested.
    #[error("unsupported reduction: {0}")]
    UnsupportedReduction(String),

    /// Too few historical buckets to fit a forecast.
    #[error("insufficient history: need at least {needed} buckets, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// The forecasting model returned inconsistent output (e.g. crossed or
    /// non-finite interval bounds, wrong horizon length).
    #[error("model output error: {0}")]
    ModelOutput(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Length mismatch between paired sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
