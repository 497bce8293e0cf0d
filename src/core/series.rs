//! Observation loading and validation.
//!
//! The series loader is the pipeline's entry point: it accepts raw
//! (timestamp, value) pairs from any iterable source, validates them, and
//! produces a chronologically sorted sequence ready for aggregation.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// A single raw observation: a timestamp and a numeric value.
///
/// Immutable once created. Duplicate timestamps are permitted; the
/// aggregator's reduction function resolves them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Observation {
    /// Create an observation, rejecting non-finite values.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(PipelineError::InvalidInput(format!(
                "non-finite value {} at {}",
                value, timestamp
            )));
        }
        Ok(Self { timestamp, value })
    }
}

/// A validated, sorted-by-timestamp sequence of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    observations: Vec<Observation>,
}

impl ObservationSeries {
    /// Build a series from (timestamp, value) pairs.
    ///
    /// Fails with [`PipelineError::InvalidInput`] if the input is empty or
    /// any value is NaN or infinite. Input order does not matter; the result
    /// is sorted by timestamp with a stable sort, so observations sharing a
    /// timestamp keep their original relative order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let mut observations = pairs
            .into_iter()
            .map(|(timestamp, value)| Observation::new(timestamp, value))
            .collect::<Result<Vec<_>>>()?;

        if observations.is_empty() {
            return Err(PipelineError::InvalidInput(
                "empty observation sequence".to_string(),
            ));
        }

        observations.sort_by_key(|o| o.timestamp);
        Ok(Self { observations })
    }

    /// Build a series from textual records, parsing each timestamp.
    ///
    /// Accepts RFC 3339 timestamps (`2024-01-01T09:30:00Z`) and bare dates
    /// (`2024-01-01`, taken as UTC midnight). Unparsable timestamps fail
    /// with [`PipelineError::InvalidInput`].
    pub fn from_records<I, S>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let pairs = records
            .into_iter()
            .map(|(raw, value)| Ok((parse_timestamp(raw.as_ref())?, value)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_pairs(pairs)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// A loaded series is never empty, but the accessor is conventional.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The observations in chronological order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Timestamp of the earliest observation.
    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.observations[0].timestamp
    }

    /// Timestamp of the latest observation.
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.observations[self.observations.len() - 1].timestamp
    }
}

/// Parse a timestamp string as RFC 3339, falling back to a bare date.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| PipelineError::InvalidInput(format!("invalid date: {raw}")))?;
        return Ok(midnight.and_utc());
    }
    Err(PipelineError::InvalidInput(format!(
        "unparsable timestamp: {raw}"
    )))
}
