//! # demand-forecast
//!
//! Time-series aggregation and demand forecasting pipeline.
//!
//! Takes raw (timestamp, value) observations, groups them into calendar
//! buckets (day, week, or month), fits a pluggable forecasting model on the
//! aggregated history, and returns point estimates with interval bounds as
//! an ordered table.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use demand_forecast::aggregate::{BucketSize, Reduction};
//! use demand_forecast::models::HoltTrend;
//! use demand_forecast::pipeline::{Pipeline, PipelineConfig};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let bookings: Vec<_> = (0..60)
//!     .map(|i| (base + Duration::days(i), 20.0 + (i % 7) as f64))
//!     .collect();
//!
//! let config = PipelineConfig::new(BucketSize::Day, Reduction::Sum, 30);
//! let pipeline = Pipeline::new(config).unwrap();
//! let mut model = HoltTrend::auto();
//!
//! let table = pipeline.run(bookings, &mut model).unwrap();
//! assert_eq!(table.len(), 30);
//! ```

pub mod aggregate;
pub mod core;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod table;

pub use error::{PipelineError, Result};

pub mod prelude {
    pub use crate::aggregate::{aggregate, BucketSize, GapPolicy, Reduction};
    pub use crate::core::{Bucket, Observation, ObservationSeries};
    pub use crate::error::{PipelineError, Result};
    pub use crate::forecast::{forecast, ForecastPoint};
    pub use crate::metrics::{calculate_metrics, AccuracyMetrics};
    pub use crate::models::{BoxedModel, HoltTrend, Model, Naive, Prediction};
    pub use crate::pipeline::{Pipeline, PipelineConfig};
    pub use crate::table::ForecastTable;
}
