//! Forecast generation over aggregated buckets.
//!
//! This stage owns the calendar: the model sees only the bucket values, and
//! the future timestamps are derived here by stepping one bucket period at a
//! time past the last historical period.

use crate::aggregate::BucketSize;
use crate::core::Bucket;
use crate::error::{PipelineError, Result};
use crate::models::Model;
use chrono::{DateTime, Utc};

/// Minimum number of historical buckets required to fit a forecast.
pub const MIN_HISTORY: usize = 2;

/// One forecast output row: a period start, the point estimate, and its
/// interval bounds. `lower <= estimate <= upper` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Fit `model` on the bucket values and produce forecast points.
///
/// Returns exactly `horizon` future points, or history + horizon points when
/// `include_history` is set. Historical estimates come from the model's
/// fitted values, with estimate-equal bounds; warm-up positions where the
/// fitted value is undefined fall back to the observed bucket value, as does
/// the entire history for a model that reports no fitted values at all.
/// Future timestamps are strictly increasing, one per bucket period,
/// starting at the period after the last historical bucket.
///
/// Fails with [`PipelineError::InsufficientHistory`] on fewer than
/// [`MIN_HISTORY`] buckets, and with [`PipelineError::ModelOutput`] when the
/// model returns a wrong-length prediction, non-finite values, or crossed
/// interval bounds.
pub fn forecast(
    buckets: &[Bucket],
    bucket_size: BucketSize,
    horizon: usize,
    level: f64,
    include_history: bool,
    model: &mut dyn Model,
) -> Result<Vec<ForecastPoint>> {
    if buckets.len() < MIN_HISTORY {
        return Err(PipelineError::InsufficientHistory {
            needed: MIN_HISTORY,
            got: buckets.len(),
        });
    }
    if horizon == 0 {
        return Err(PipelineError::InvalidParameter(
            "horizon must be at least 1".to_string(),
        ));
    }

    let history: Vec<f64> = buckets.iter().map(|b| b.value).collect();
    model.fit(&history)?;
    let prediction = model.predict_with_intervals(horizon, level)?;

    if prediction.horizon() != horizon {
        return Err(PipelineError::ModelOutput(format!(
            "model {} returned {} steps for horizon {}",
            model.name(),
            prediction.horizon(),
            horizon
        )));
    }
    for (side, bounds) in [("lower", prediction.lower()), ("upper", prediction.upper())] {
        if let Some(bounds) = bounds {
            if bounds.len() != horizon {
                return Err(PipelineError::ModelOutput(format!(
                    "model {} returned {} {side} bounds for horizon {}",
                    model.name(),
                    bounds.len(),
                    horizon
                )));
            }
        }
    }

    let mut points = Vec::with_capacity(if include_history {
        buckets.len() + horizon
    } else {
        horizon
    });

    if include_history {
        let fitted = model.fitted_values().unwrap_or(&[]);
        if !fitted.is_empty() && fitted.len() != buckets.len() {
            return Err(PipelineError::ModelOutput(format!(
                "model {} returned {} fitted values for {} buckets",
                model.name(),
                fitted.len(),
                buckets.len()
            )));
        }
        for (i, bucket) in buckets.iter().enumerate() {
            let estimate = match fitted.get(i) {
                Some(f) if !f.is_nan() => *f,
                _ => bucket.value,
            };
            points.push(validated_point(bucket.period_start, estimate, estimate, estimate)?);
        }
    }

    let point = prediction.point();
    let lower = prediction.lower();
    let upper = prediction.upper();

    let mut timestamp = bucket_size.next_period(buckets[buckets.len() - 1].period_start);
    for i in 0..horizon {
        let estimate = point[i];
        let lo = lower.map_or(estimate, |l| l[i]);
        let hi = upper.map_or(estimate, |u| u[i]);
        points.push(validated_point(timestamp, estimate, lo, hi)?);
        timestamp = bucket_size.next_period(timestamp);
    }

    Ok(points)
}

/// Reject non-finite values and crossed bounds rather than passing them on.
fn validated_point(
    timestamp: DateTime<Utc>,
    estimate: f64,
    lower: f64,
    upper: f64,
) -> Result<ForecastPoint> {
    if !estimate.is_finite() || !lower.is_finite() || !upper.is_finite() {
        return Err(PipelineError::ModelOutput(format!(
            "non-finite forecast at {timestamp}: estimate={estimate}, lower={lower}, upper={upper}"
        )));
    }
    if lower > estimate || estimate > upper {
        return Err(PipelineError::ModelOutput(format!(
            "inconsistent bounds at {timestamp}: lower={lower}, estimate={estimate}, upper={upper}"
        )));
    }
    Ok(ForecastPoint {
        timestamp,
        estimate,
        lower,
        upper,
    })
}
