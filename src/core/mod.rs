//! Core data structures shared by the pipeline stages.

mod bucket;
mod series;

pub use bucket::Bucket;
pub use series::{Observation, ObservationSeries};
