//! Forecast records and the tabular export format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Column header of the tabular export.
pub const CSV_HEADER: &str = "date,prediction,lower_bound,upper_bound,trend,seasonal";

/// One projected step with its uncertainty band and components.
///
/// `lower_bound <= point_estimate <= upper_bound` holds for every point produced
/// by [`crate::models::FittedModel::predict`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Trend value including changepoint adjustments.
    pub trend_component: f64,
    pub seasonal_component: f64,
}

impl ForecastPoint {
    /// Width of the uncertainty band.
    pub fn band_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    /// Check whether a realised value falls inside the band.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }
}

/// Flat row of the export table, one per forecast point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub prediction: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub trend: f64,
    pub seasonal: f64,
}

impl From<&ForecastPoint> for ForecastRow {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            date: point.timestamp.format("%Y-%m-%d").to_string(),
            prediction: point.point_estimate,
            lower_bound: point.lower_bound,
            upper_bound: point.upper_bound,
            trend: point.trend_component,
            seasonal: point.seasonal_component,
        }
    }
}

impl ForecastRow {
    /// Render as one comma-separated line (no trailing newline).
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.date,
            self.prediction,
            self.lower_bound,
            self.upper_bound,
            self.trend,
            self.seasonal,
        )
    }
}

/// Write forecast points as CSV: header line then one row per point.
pub fn write_csv<W: Write>(mut writer: W, points: &[ForecastPoint]) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for point in points {
        writeln!(writer, "{}", ForecastRow::from(point).to_csv_line())?;
    }
    writer.flush()
}
