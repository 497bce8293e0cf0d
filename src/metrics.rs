//! Accuracy metrics for forecast evaluation.

use crate::error::{PipelineError, Result};

/// Accuracy metrics for evaluating forecast performance.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error (None if zeros in actual)
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// Pairs where either side is NaN are skipped, so fitted values with an
/// undefined warm-up prefix can be scored directly.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(PipelineError::InvalidInput(
            "cannot score empty sequences".to_string(),
        ));
    }
    if actual.len() != predicted.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let pairs: Vec<(f64, f64)> = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| !a.is_nan() && !p.is_nan())
        .map(|(&a, &p)| (a, p))
        .collect();

    if pairs.is_empty() {
        return Err(PipelineError::InvalidInput(
            "no valid (actual, predicted) pairs to score".to_string(),
        ));
    }

    let n = pairs.len() as f64;

    let mae = pairs.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let mse = pairs.iter().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let mape = if pairs.iter().any(|(a, _)| *a == 0.0) {
        None
    } else {
        Some(pairs.iter().map(|(a, p)| ((a - p) / a).abs()).sum::<f64>() / n * 100.0)
    };

    let smape = pairs
        .iter()
        .map(|(a, p)| {
            let denom = (a.abs() + p.abs()) / 2.0;
            if denom == 0.0 {
                0.0
            } else {
                (a - p).abs() / denom
            }
        })
        .sum::<f64>()
        / n
        * 100.0;

    Ok(AccuracyMetrics {
        mae,
        mse,
        rmse,
        mape,
        smape,
    })
}
