//! Aggregated time buckets.

use chrono::{DateTime, Utc};

/// One aggregated period: the period start and the reduced value of all
/// observations falling inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub period_start: DateTime<Utc>,
    pub value: f64,
}

impl Bucket {
    pub fn new(period_start: DateTime<Utc>, value: f64) -> Self {
        Self {
            period_start,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bucket_holds_period_and_value() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bucket = Bucket::new(start, 42.0);
        assert_eq!(bucket.period_start, start);
        assert_eq!(bucket.value, 42.0);
    }
}
