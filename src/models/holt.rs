//! Holt's linear trend model (double exponential smoothing).
//!
//! Smooths a level and a trend component and extrapolates them linearly.
//! This is the default model for demand series with growth or decline but no
//! strong seasonality.

use crate::error::{PipelineError, Result};
use crate::metrics::calculate_metrics;
use crate::models::{interval_z, Model, Prediction};

/// Candidate smoothing parameters tried by the auto variant.
const PARAM_GRID: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// Holt's linear trend forecaster.
///
/// Model equations:
/// - level:    `l_t = alpha * y_t + (1 - alpha) * (l_{t-1} + b_{t-1})`
/// - trend:    `b_t = beta * (l_t - l_{t-1}) + (1 - beta) * b_{t-1}`
/// - forecast: `y_{t+h} = l_t + h * b_t`
#[derive(Debug, Clone)]
pub struct HoltTrend {
    alpha: Option<f64>,
    beta: Option<f64>,
    optimize: bool,
    level: Option<f64>,
    trend: Option<f64>,
    fitted: Option<Vec<f64>>,
    residual_sigma: Option<f64>,
}

impl HoltTrend {
    /// Create a model with fixed smoothing parameters, clamped to (0, 1).
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: Some(alpha.clamp(0.0001, 0.9999)),
            beta: Some(beta.clamp(0.0001, 0.9999)),
            optimize: false,
            level: None,
            trend: None,
            fitted: None,
            residual_sigma: None,
        }
    }

    /// Create a model that selects `(alpha, beta)` by grid search on
    /// in-sample one-step MAE.
    pub fn auto() -> Self {
        Self {
            alpha: None,
            beta: None,
            optimize: true,
            level: None,
            trend: None,
            fitted: None,
            residual_sigma: None,
        }
    }

    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    pub fn trend(&self) -> Option<f64> {
        self.trend
    }

    /// One smoothing pass. Returns the final level, final trend, and the
    /// one-step fitted values (first entry equals the initial level).
    fn smooth(history: &[f64], alpha: f64, beta: f64) -> (f64, f64, Vec<f64>) {
        let mut l = history[0];
        let mut b = history[1] - history[0];

        let mut fitted = Vec::with_capacity(history.len());
        fitted.push(l);

        for &y in &history[1..] {
            let one_step = l + b;
            fitted.push(one_step);

            let l_prev = l;
            l = alpha * y + (1.0 - alpha) * (l_prev + b);
            b = beta * (l - l_prev) + (1.0 - beta) * b;
        }

        (l, b, fitted)
    }

    /// Grid search for the parameter pair with the lowest one-step MAE.
    fn select_params(history: &[f64]) -> (f64, f64) {
        let mut best = (PARAM_GRID[2], PARAM_GRID[0]);
        let mut best_mae = f64::MAX;

        for &alpha in &PARAM_GRID {
            for &beta in &PARAM_GRID {
                let (_, _, fitted) = Self::smooth(history, alpha, beta);
                let mae = calculate_metrics(&history[1..], &fitted[1..])
                    .map(|m| m.mae)
                    .unwrap_or(f64::MAX);
                if mae < best_mae {
                    best_mae = mae;
                    best = (alpha, beta);
                }
            }
        }

        best
    }
}

impl Default for HoltTrend {
    fn default() -> Self {
        Self::auto()
    }
}

impl Model for HoltTrend {
    fn fit(&mut self, history: &[f64]) -> Result<()> {
        if history.len() < 2 {
            return Err(PipelineError::InsufficientHistory {
                needed: 2,
                got: history.len(),
            });
        }

        if self.optimize {
            let (alpha, beta) = Self::select_params(history);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
        }

        let alpha = self.alpha.ok_or(PipelineError::FitRequired)?;
        let beta = self.beta.ok_or(PipelineError::FitRequired)?;

        let (level, trend, fitted) = Self::smooth(history, alpha, beta);

        let residuals: Vec<f64> = history[1..]
            .iter()
            .zip(fitted[1..].iter())
            .map(|(y, f)| y - f)
            .collect();
        let variance = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;

        self.level = Some(level);
        self.trend = Some(trend);
        self.fitted = Some(fitted);
        self.residual_sigma = Some(variance.sqrt());
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Prediction> {
        let l = self.level.ok_or(PipelineError::FitRequired)?;
        let b = self.trend.ok_or(PipelineError::FitRequired)?;

        let point: Vec<f64> = (1..=horizon).map(|h| l + h as f64 * b).collect();
        Ok(Prediction::from_values(point))
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Prediction> {
        let l = self.level.ok_or(PipelineError::FitRequired)?;
        let b = self.trend.ok_or(PipelineError::FitRequired)?;
        let sigma = self.residual_sigma.ok_or(PipelineError::FitRequired)?;

        let z = interval_z(level);
        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);

        for h in 1..=horizon {
            let estimate = l + h as f64 * b;
            // Approximate standard error growing with sqrt(h).
            let se = sigma * (h as f64).sqrt();
            point.push(estimate);
            lower.push(estimate - z * se);
            upper.push(estimate + z * se);
        }

        Ok(Prediction::from_values_with_intervals(point, lower, upper))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &str {
        "HoltTrend"
    }
}
