//! Forecasting models.
//!
//! The pipeline depends on forecasting only through the [`Model`] trait, so
//! the trend/seasonality machinery is a replaceable collaborator: any fit /
//! predict implementation can be plugged in, including stubs in tests.

mod holt;
mod naive;

pub use holt::HoltTrend;
pub use naive::Naive;

use crate::error::Result;
use statrs::distribution::{ContinuousCDF, Normal};

/// A univariate prediction with optional interval bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl Prediction {
    /// Create a prediction from point estimates only.
    pub fn from_values(point: Vec<f64>) -> Self {
        Self {
            point,
            lower: None,
            upper: None,
        }
    }

    /// Create a prediction with interval bounds.
    pub fn from_values_with_intervals(point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self {
            point,
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Number of predicted steps.
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }
}

/// Common interface for forecasting models.
///
/// Object-safe; usable as `Box<dyn Model>`.
pub trait Model {
    /// Fit the model to a historical value sequence.
    fn fit(&mut self, history: &[f64]) -> Result<()>;

    /// Predict point estimates for the given horizon.
    fn predict(&self, horizon: usize) -> Result<Prediction>;

    /// Predict with interval bounds at the given confidence level.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Prediction> {
        let _ = level;
        self.predict(horizon)
    }

    /// In-sample one-step predictions, if fitted. Warm-up positions may be NaN.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Model display name.
    fn name(&self) -> &str;

    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed model trait objects.
pub type BoxedModel = Box<dyn Model>;

/// Standard normal quantile for two-sided intervals at `level`.
pub(crate) fn interval_z(level: f64) -> f64 {
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.inverse_cdf((1.0 + level) / 2.0)
}
