//! Naive baseline model: repeat the last observed value.

use crate::error::{PipelineError, Result};
use crate::models::{interval_z, Model, Prediction};

/// Naive forecaster. Useful as a baseline and as a cheap sanity check for
/// the pipeline wiring.
#[derive(Debug, Clone, Default)]
pub struct Naive {
    last_value: Option<f64>,
    fitted: Option<Vec<f64>>,
    residual_sigma: Option<f64>,
}

impl Naive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Model for Naive {
    fn fit(&mut self, history: &[f64]) -> Result<()> {
        if history.is_empty() {
            return Err(PipelineError::InvalidInput(
                "cannot fit on an empty history".to_string(),
            ));
        }

        self.last_value = Some(history[history.len() - 1]);

        // One-step fitted values are the shifted history; the first is undefined.
        let mut fitted = Vec::with_capacity(history.len());
        fitted.push(f64::NAN);
        fitted.extend_from_slice(&history[..history.len() - 1]);

        // Residuals of the naive model are the first differences.
        let diffs: Vec<f64> = history.windows(2).map(|w| w[1] - w[0]).collect();
        self.residual_sigma = if diffs.is_empty() {
            None
        } else {
            let variance = diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64;
            Some(variance.sqrt())
        };

        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Prediction> {
        let last = self.last_value.ok_or(PipelineError::FitRequired)?;
        Ok(Prediction::from_values(vec![last; horizon]))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Prediction> {
        let last = self.last_value.ok_or(PipelineError::FitRequired)?;

        let Some(sigma) = self.residual_sigma else {
            // Single-point history: no residual spread, intervals collapse.
            let point = vec![last; horizon];
            return Ok(Prediction::from_values_with_intervals(
                point.clone(),
                point.clone(),
                point,
            ));
        };

        let z = interval_z(level);
        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);

        for h in 1..=horizon {
            // Random-walk forecast variance grows linearly with the horizon.
            let se = sigma * (h as f64).sqrt();
            point.push(last);
            lower.push(last - z * se);
            upper.push(last + z * se);
        }

        Ok(Prediction::from_values_with_intervals(point, lower, upper))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &str {
        "Naive"
    }
}
