//! Tabular forecast output for rendering layers.

use crate::forecast::ForecastPoint;
use chrono::{DateTime, Utc};
use std::fmt;

/// Forecast output as an ordered table with a fixed column set.
///
/// A pure view over the forecast points: a chart or report layer can consume
/// the rows or the per-column accessors without knowing anything about the
/// pipeline that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    rows: Vec<ForecastPoint>,
}

impl ForecastTable {
    /// Column names, in row order.
    pub const COLUMNS: [&'static str; 4] = ["timestamp", "estimate", "lower", "upper"];

    pub fn from_points(rows: Vec<ForecastPoint>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ForecastPoint] {
        &self.rows
    }

    /// The timestamp column.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }

    /// The point-estimate column.
    pub fn estimates(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.estimate).collect()
    }

    /// The lower-bound column.
    pub fn lower_bounds(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.lower).collect()
    }

    /// The upper-bound column.
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.upper).collect()
    }
}

impl fmt::Display for ForecastTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<25} {:>12} {:>12} {:>12}",
            Self::COLUMNS[0],
            Self::COLUMNS[1],
            Self::COLUMNS[2],
            Self::COLUMNS[3]
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<25} {:>12.3} {:>12.3} {:>12.3}",
                row.timestamp.to_rfc3339(),
                row.estimate,
                row.lower,
                row.upper
            )?;
        }
        Ok(())
    }
}
