//! End-to-end forecasting pipeline.
//!
//! Chains the four stages: load observations, aggregate into calendar
//! buckets, fit and run a forecasting model, and format the result as a
//! table. Each invocation is independent and side-effect-free; the pipeline
//! holds no mutable state, so one instance may be shared across threads as
//! long as each call supplies its own observations and model.

use crate::aggregate::{aggregate, BucketSize, GapPolicy, Reduction};
use crate::core::ObservationSeries;
use crate::error::{PipelineError, Result};
use crate::forecast::{forecast, MIN_HISTORY};
use crate::metrics::{calculate_metrics, AccuracyMetrics};
use crate::models::Model;
use crate::table::ForecastTable;
use chrono::{DateTime, Utc};

/// Configuration for one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub bucket_size: BucketSize,
    pub reduction: Reduction,
    pub gap_policy: GapPolicy,
    /// Number of future buckets to forecast. Must be at least 1.
    pub horizon: usize,
    /// Two-sided confidence level for interval bounds, in (0, 1).
    pub level: f64,
    /// Emit historical fitted points ahead of the future points.
    pub include_history: bool,
}

impl PipelineConfig {
    /// Create a configuration with the given core parameters and defaults
    /// for the rest: gaps omitted, 95% intervals, future points only.
    pub fn new(bucket_size: BucketSize, reduction: Reduction, horizon: usize) -> Self {
        Self {
            bucket_size,
            reduction,
            gap_policy: GapPolicy::default(),
            horizon,
            level: 0.95,
            include_history: false,
        }
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    pub fn with_history(mut self) -> Self {
        self.include_history = true;
        self
    }

    /// Validate the configuration before use.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(PipelineError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        if !(self.level > 0.0 && self.level < 1.0) {
            return Err(PipelineError::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {}",
                self.level
            )));
        }
        Ok(())
    }
}

/// The forecasting pipeline. Construction validates the configuration once;
/// every subsequent run reuses it unchanged.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline on raw (timestamp, value) pairs.
    pub fn run<I>(&self, pairs: I, model: &mut dyn Model) -> Result<ForecastTable>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let series = ObservationSeries::from_pairs(pairs)?;
        self.run_series(&series, model)
    }

    /// Run the aggregation and forecasting stages on an already-loaded series.
    pub fn run_series(
        &self,
        series: &ObservationSeries,
        model: &mut dyn Model,
    ) -> Result<ForecastTable> {
        let buckets = aggregate(
            series.observations(),
            self.config.bucket_size,
            self.config.reduction,
            self.config.gap_policy,
        )?;
        let points = forecast(
            &buckets,
            self.config.bucket_size,
            self.config.horizon,
            self.config.level,
            self.config.include_history,
            model,
        )?;
        Ok(ForecastTable::from_points(points))
    }

    /// Score the model on a trailing holdout of the aggregated series.
    ///
    /// The last `holdout` buckets are withheld, the model is fitted on the
    /// rest, and its point forecasts are compared against the withheld
    /// values.
    pub fn backtest(
        &self,
        series: &ObservationSeries,
        holdout: usize,
        model: &mut dyn Model,
    ) -> Result<AccuracyMetrics> {
        if holdout == 0 {
            return Err(PipelineError::InvalidParameter(
                "holdout must be at least 1".to_string(),
            ));
        }

        let buckets = aggregate(
            series.observations(),
            self.config.bucket_size,
            self.config.reduction,
            self.config.gap_policy,
        )?;
        if buckets.len() < holdout + MIN_HISTORY {
            return Err(PipelineError::InsufficientHistory {
                needed: holdout + MIN_HISTORY,
                got: buckets.len(),
            });
        }

        let split = buckets.len() - holdout;
        let train: Vec<f64> = buckets[..split].iter().map(|b| b.value).collect();
        let actual: Vec<f64> = buckets[split..].iter().map(|b| b.value).collect();

        model.fit(&train)?;
        let prediction = model.predict(holdout)?;
        calculate_metrics(&actual, prediction.point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoltTrend, Naive};
    use chrono::TimeZone;

    fn daily_pairs(values: &[f64]) -> Vec<(DateTime<Utc>, f64)> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (base + chrono::Duration::days(i as i64), v))
            .collect()
    }

    #[test]
    fn pipeline_runs_end_to_end() {
        let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 7);
        let pipeline = Pipeline::new(config).unwrap();

        let values: Vec<f64> = (0..30).map(|i| 20.0 + (i % 7) as f64).collect();
        let mut model = HoltTrend::new(0.3, 0.1);
        let table = pipeline.run(daily_pairs(&values), &mut model).unwrap();

        assert_eq!(table.len(), 7);
        for row in table.rows() {
            assert!(row.lower <= row.estimate && row.estimate <= row.upper);
        }
    }

    #[test]
    fn pipeline_with_history_emits_history_plus_horizon() {
        let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 5).with_history();
        let pipeline = Pipeline::new(config).unwrap();

        let values: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        let mut model = Naive::new();
        let table = pipeline.run(daily_pairs(&values), &mut model).unwrap();

        assert_eq!(table.len(), 10 + 5);
    }

    #[test]
    fn pipeline_rejects_zero_horizon() {
        let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 0);
        assert!(matches!(
            Pipeline::new(config),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn pipeline_rejects_out_of_range_level() {
        let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 5).with_level(1.5);
        assert!(matches!(
            Pipeline::new(config),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn pipeline_propagates_empty_input_error() {
        let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 5);
        let pipeline = Pipeline::new(config).unwrap();

        let mut model = Naive::new();
        let result = pipeline.run(Vec::new(), &mut model);
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn backtest_scores_a_trailing_holdout() {
        let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 5);
        let pipeline = Pipeline::new(config).unwrap();

        let values: Vec<f64> = (0..20).map(|i| 10.0 + 2.0 * i as f64).collect();
        let series = ObservationSeries::from_pairs(daily_pairs(&values)).unwrap();

        let mut model = HoltTrend::new(0.8, 0.8);
        let metrics = pipeline.backtest(&series, 5, &mut model).unwrap();

        // A clean linear series should backtest with small error.
        assert!(metrics.mae < 2.0, "mae = {}", metrics.mae);
    }

    #[test]
    fn backtest_rejects_too_large_holdout() {
        let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 5);
        let pipeline = Pipeline::new(config).unwrap();

        let series = ObservationSeries::from_pairs(daily_pairs(&[1.0, 2.0, 3.0])).unwrap();
        let mut model = Naive::new();

        assert!(matches!(
            pipeline.backtest(&series, 3, &mut model),
            Err(PipelineError::InsufficientHistory { .. })
        ));
    }
}
