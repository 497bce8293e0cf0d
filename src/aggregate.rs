//! Time-bucket aggregation.
//!
//! Partitions observations into calendar-aligned periods (day, week, month)
//! and reduces each period to a single value. Aggregation is deterministic:
//! identical input and configuration always produce identical buckets, with
//! no dependence on the system clock.

use crate::core::{Bucket, Observation};
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Calendar period used to group observations.
///
/// Boundaries follow a fixed calendar rule at UTC midnight: weeks start on
/// Monday and months on the 1st.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketSize {
    Day,
    Week,
    Month,
}

impl BucketSize {
    /// The start of the period containing `timestamp`.
    pub fn period_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let date = timestamp.date_naive();
        let start = match self {
            BucketSize::Day => date,
            BucketSize::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            BucketSize::Month => first_of_month(date.year(), date.month()),
        };
        midnight(start)
    }

    /// The start of the period immediately after `period_start`.
    pub fn next_period(&self, period_start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            BucketSize::Day => period_start + Duration::days(1),
            BucketSize::Week => period_start + Duration::days(7),
            BucketSize::Month => {
                let date = period_start.date_naive();
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                midnight(first_of_month(year, month))
            }
        }
    }
}

impl FromStr for BucketSize {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(BucketSize::Day),
            "week" | "weekly" => Ok(BucketSize::Week),
            "month" | "monthly" => Ok(BucketSize::Month),
            other => Err(PipelineError::InvalidParameter(format!(
                "unrecognized bucket size: {other}"
            ))),
        }
    }
}

/// Function used to combine all observation values within one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Mean,
    Count,
}

impl Reduction {
    fn apply(&self, sum: f64, count: usize) -> f64 {
        match self {
            Reduction::Sum => sum,
            Reduction::Mean => sum / count as f64,
            Reduction::Count => count as f64,
        }
    }
}

impl FromStr for Reduction {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(Reduction::Sum),
            "mean" | "avg" | "average" => Ok(Reduction::Mean),
            "count" => Ok(Reduction::Count),
            other => Err(PipelineError::UnsupportedReduction(other.to_string())),
        }
    }
}

/// Handling of periods with no observations between the first and last bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Emit only periods that contain observations.
    #[default]
    Omit,
    /// Emit every period in range, filling empty ones with 0.0.
    ZeroFill,
}

/// Group observations into calendar buckets and reduce each one.
///
/// Fails with [`PipelineError::InvalidInput`] on empty input. Output buckets
/// are strictly ordered by `period_start` with no duplicate periods.
pub fn aggregate(
    observations: &[Observation],
    bucket_size: BucketSize,
    reduction: Reduction,
    gap_policy: GapPolicy,
) -> Result<Vec<Bucket>> {
    if observations.is_empty() {
        return Err(PipelineError::InvalidInput(
            "cannot aggregate an empty observation sequence".to_string(),
        ));
    }

    // BTreeMap keeps periods chronologically ordered regardless of input order.
    let mut periods: BTreeMap<DateTime<Utc>, (f64, usize)> = BTreeMap::new();
    for obs in observations {
        let entry = periods
            .entry(bucket_size.period_start(obs.timestamp))
            .or_insert((0.0, 0));
        entry.0 += obs.value;
        entry.1 += 1;
    }

    let buckets: Vec<Bucket> = periods
        .iter()
        .map(|(&start, &(sum, count))| Bucket::new(start, reduction.apply(sum, count)))
        .collect();

    match gap_policy {
        GapPolicy::Omit => Ok(buckets),
        GapPolicy::ZeroFill => Ok(zero_fill(&buckets, bucket_size)),
    }
}

/// Insert zero-valued buckets for every missing period in range.
fn zero_fill(buckets: &[Bucket], bucket_size: BucketSize) -> Vec<Bucket> {
    let mut filled = Vec::with_capacity(buckets.len());
    let mut expected = buckets[0].period_start;
    for bucket in buckets {
        while expected < bucket.period_start {
            filled.push(Bucket::new(expected, 0.0));
            expected = bucket_size.next_period(expected);
        }
        filled.push(*bucket);
        expected = bucket_size.next_period(bucket.period_start);
    }
    filled
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Month is always in 1..=12 here, so the date is always valid.
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is a valid date")
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ObservationSeries;
    use chrono::TimeZone;

    fn ts(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    fn series(pairs: Vec<(DateTime<Utc>, f64)>) -> ObservationSeries {
        ObservationSeries::from_pairs(pairs).unwrap()
    }

    #[test]
    fn daily_sum_keeps_one_bucket_per_day() {
        let s = series(vec![(ts(1, 1), 10.0), (ts(1, 2), 20.0), (ts(1, 3), 15.0)]);
        let buckets = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Sum,
            GapPolicy::Omit,
        )
        .unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0], Bucket::new(ts(1, 1), 10.0));
        assert_eq!(buckets[1], Bucket::new(ts(1, 2), 20.0));
        assert_eq!(buckets[2], Bucket::new(ts(1, 3), 15.0));
    }

    #[test]
    fn duplicate_timestamps_are_reduced() {
        let s = series(vec![(ts(1, 1), 10.0), (ts(1, 1), 30.0), (ts(1, 2), 5.0)]);

        let sums = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Sum,
            GapPolicy::Omit,
        )
        .unwrap();
        assert_eq!(sums[0].value, 40.0);

        let means = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Mean,
            GapPolicy::Omit,
        )
        .unwrap();
        assert_eq!(means[0].value, 20.0);

        let counts = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Count,
            GapPolicy::Omit,
        )
        .unwrap();
        assert_eq!(counts[0].value, 2.0);
        assert_eq!(counts[1].value, 1.0);
    }

    #[test]
    fn sub_daily_observations_fall_into_their_day() {
        let s = series(vec![
            (Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(), 1.0),
            (Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(), 2.0),
            (Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(), 4.0),
        ]);
        let buckets = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Sum,
            GapPolicy::Omit,
        )
        .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], Bucket::new(ts(1, 1), 3.0));
        assert_eq!(buckets[1], Bucket::new(ts(1, 2), 4.0));
    }

    #[test]
    fn weeks_start_monday() {
        // 2024-01-01 is a Monday; 2024-01-07 Sunday; 2024-01-08 next Monday.
        let s = series(vec![(ts(1, 3), 1.0), (ts(1, 7), 2.0), (ts(1, 8), 4.0)]);
        let buckets = aggregate(
            s.observations(),
            BucketSize::Week,
            Reduction::Sum,
            GapPolicy::Omit,
        )
        .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], Bucket::new(ts(1, 1), 3.0));
        assert_eq!(buckets[1], Bucket::new(ts(1, 8), 4.0));
    }

    #[test]
    fn months_start_on_the_first() {
        let s = series(vec![(ts(1, 15), 1.0), (ts(1, 31), 2.0), (ts(2, 1), 4.0)]);
        let buckets = aggregate(
            s.observations(),
            BucketSize::Month,
            Reduction::Sum,
            GapPolicy::Omit,
        )
        .unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], Bucket::new(ts(1, 1), 3.0));
        assert_eq!(buckets[1], Bucket::new(ts(2, 1), 4.0));
    }

    #[test]
    fn month_period_advances_across_year_boundary() {
        let december = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        let january = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(BucketSize::Month.next_period(december), january);
    }

    #[test]
    fn zero_fill_inserts_missing_periods() {
        let s = series(vec![(ts(1, 1), 10.0), (ts(1, 4), 20.0)]);
        let buckets = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Sum,
            GapPolicy::ZeroFill,
        )
        .unwrap();

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[1], Bucket::new(ts(1, 2), 0.0));
        assert_eq!(buckets[2], Bucket::new(ts(1, 3), 0.0));
        assert_eq!(buckets[3], Bucket::new(ts(1, 4), 20.0));
    }

    #[test]
    fn omit_policy_skips_missing_periods() {
        let s = series(vec![(ts(1, 1), 10.0), (ts(1, 4), 20.0)]);
        let buckets = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Sum,
            GapPolicy::Omit,
        )
        .unwrap();

        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = aggregate(&[], BucketSize::Day, Reduction::Sum, GapPolicy::Omit);
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn buckets_are_strictly_ordered_without_duplicates() {
        let s = series(vec![
            (ts(1, 5), 1.0),
            (ts(1, 1), 2.0),
            (ts(1, 5), 3.0),
            (ts(1, 3), 4.0),
        ]);
        let buckets = aggregate(
            s.observations(),
            BucketSize::Day,
            Reduction::Sum,
            GapPolicy::Omit,
        )
        .unwrap();

        for window in buckets.windows(2) {
            assert!(window[0].period_start < window[1].period_start);
        }
    }

    #[test]
    fn bucket_size_parses_known_units() {
        assert_eq!("day".parse::<BucketSize>().unwrap(), BucketSize::Day);
        assert_eq!("Weekly".parse::<BucketSize>().unwrap(), BucketSize::Week);
        assert_eq!("MONTH".parse::<BucketSize>().unwrap(), BucketSize::Month);
        assert!(matches!(
            "fortnight".parse::<BucketSize>(),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn reduction_parses_known_names() {
        assert_eq!("sum".parse::<Reduction>().unwrap(), Reduction::Sum);
        assert_eq!("Mean".parse::<Reduction>().unwrap(), Reduction::Mean);
        assert_eq!("count".parse::<Reduction>().unwrap(), Reduction::Count);
        assert!(matches!(
            "median".parse::<Reduction>(),
            Err(PipelineError::UnsupportedReduction(_))
        ));
    }
}
