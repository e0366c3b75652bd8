//! Windowed slope-comparison changepoint detector.

use crate::core::{values_of, ObservedPoint};
use crate::error::{ForecastError, Result};
use crate::trend::fit_indexed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for slope-change detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeChangeConfig {
    /// Points in each of the before/after windows
    pub window_size: usize,
    /// Minimum absolute slope difference to flag a changepoint
    pub threshold: f64,
}

impl Default for SlopeChangeConfig {
    fn default() -> Self {
        Self {
            window_size: 12,
            threshold: 500.0,
        }
    }
}

impl SlopeChangeConfig {
    /// Set the window size.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the slope-delta threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint window must hold at least 2 points, got {}",
                self.window_size
            )));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint threshold must be positive, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// A detected shift in trend slope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Changepoint {
    /// Position in the historical series; the first point of the "after" window.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    /// `|after.slope - before.slope|`
    pub slope_delta: f64,
}

/// Absolute slope difference at every candidate index.
///
/// Candidates are `window..n-window` (end exclusive); each window is re-indexed
/// from 0 before fitting. Returns an empty vector when `n < 2 * window` or `window < 2`.
pub fn slope_deltas(values: &[f64], window: usize) -> Vec<(usize, f64)> {
    let n = values.len();
    if window < 2 || n < 2 * window {
        return Vec::new();
    }

    (window..n - window)
        .filter_map(|i| {
            let before = window_slope(&values[i - window..i])?;
            let after = window_slope(&values[i..i + window])?;
            Some((i, (after - before).abs()))
        })
        .collect()
}

fn window_slope(window: &[f64]) -> Option<f64> {
    fit_indexed(window).ok().map(|t| t.slope)
}

/// Detect slope changepoints in a historical series.
///
/// Fails only on invalid configuration; a series shorter than two windows
/// yields an empty list.
pub fn detect_changepoints(
    points: &[ObservedPoint],
    config: &SlopeChangeConfig,
) -> Result<Vec<Changepoint>> {
    config.validate()?;

    let values = values_of(points);
    let changepoints: Vec<Changepoint> = slope_deltas(&values, config.window_size)
        .into_iter()
        .filter(|&(_, delta)| delta > config.threshold)
        .map(|(index, slope_delta)| {
            debug!(index, slope_delta, "slope changepoint");
            Changepoint {
                index,
                timestamp: points[index].timestamp(),
                slope_delta,
            }
        })
        .collect();

    Ok(changepoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn history(values: &[f64]) -> Vec<ObservedPoint> {
        let base = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ObservedPoint::new(base + Duration::weeks(i as i64), v).unwrap())
            .collect()
    }

    fn broken_line(n: usize, break_at: usize, m1: f64, m2: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                if i < break_at {
                    1000.0 + m1 * i as f64
                } else {
                    1000.0 + m1 * break_at as f64 + m2 * (i - break_at) as f64
                }
            })
            .collect()
    }

    #[test]
    fn detects_slope_change_near_midpoint() {
        let values = broken_line(60, 30, 10.0, 50.0);
        let config = SlopeChangeConfig::default().window_size(8).threshold(20.0);
        let found = detect_changepoints(&history(&values), &config).unwrap();

        assert!(!found.is_empty());
        assert!(found.iter().any(|cp| cp.index == 30));
        for cp in &found {
            assert!((cp.index as i64 - 30).abs() < 8);
            assert!(cp.slope_delta > 20.0);
        }
        let at_break = found.iter().find(|cp| cp.index == 30).unwrap();
        assert!((at_break.slope_delta - 40.0).abs() < 1e-9);
    }

    #[test]
    fn changepoints_are_in_increasing_index_order_and_carry_timestamps() {
        let values = broken_line(60, 30, 0.0, 40.0);
        let points = history(&values);
        let config = SlopeChangeConfig::default().window_size(6).threshold(5.0);
        let found = detect_changepoints(&points, &config).unwrap();
        assert!(found.len() > 1, "adjacent indices are not merged");
        for pair in found.windows(2) {
            assert!(pair[0].index < pair[1].index);
        }
        for cp in &found {
            assert_eq!(cp.timestamp, points[cp.index].timestamp());
        }
    }

    #[test]
    fn straight_line_has_no_changepoints() {
        let values: Vec<f64> = (0..50).map(|i| 2000.0 + 25.0 * i as f64).collect();
        let config = SlopeChangeConfig::default().window_size(5).threshold(1.0);
        assert!(detect_changepoints(&history(&values), &config)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn short_series_yields_empty_result() {
        let values = broken_line(15, 7, 0.0, 100.0);
        let config = SlopeChangeConfig::default().window_size(8).threshold(1.0);
        assert!(detect_changepoints(&history(&values), &config)
            .unwrap()
            .is_empty());
        assert!(slope_deltas(&values, 8).is_empty());
    }

    #[test]
    fn candidate_range_excludes_both_edges() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let indices: Vec<usize> = slope_deltas(&values, 3).into_iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![3, 4, 5, 6]);
    }

    #[test]
    fn rejects_invalid_configuration() {
        let points = history(&[1.0; 10]);
        for config in [
            SlopeChangeConfig::default().window_size(0),
            SlopeChangeConfig::default().window_size(1),
            SlopeChangeConfig::default().threshold(0.0),
            SlopeChangeConfig::default().threshold(-3.0),
            SlopeChangeConfig::default().threshold(f64::NAN),
        ] {
            let err = detect_changepoints(&points, &config).unwrap_err();
            assert!(matches!(err, ForecastError::InvalidParameter(_)));
        }
    }
}
