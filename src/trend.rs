//! Linear trend estimation.
//!
//! Closed-form least-squares fit of a value sequence against its index.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Best-fit line `value = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    /// Evaluate the line at `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Residuals of `values` against the line, with `x` = position.
    pub fn detrend(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| v - self.value_at(i as f64))
            .collect()
    }
}

/// Fit a line through `(x, y)` pairs.
///
/// Fails with [`ForecastError::InsufficientData`] for fewer than two points and
/// [`ForecastError::DegenerateInput`] when every `x` is identical or the
/// sums overflow.
pub fn fit_trend(points: &[(f64, f64)]) -> Result<TrendModel> {
    let n = points.len();
    if n < 2 {
        return Err(ForecastError::InsufficientData { needed: 2, got: n });
    }
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(ForecastError::InvalidParameter(
            "trend input must be finite".to_string(),
        ));
    }

    let nf = n as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let mean_x = sum_x / nf;
    let mean_y = sum_y / nf;

    // Centered sums equal (nΣxy − ΣxΣy)/n and (nΣx² − (Σx)²)/n
    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    let mut scale = 0.0;
    for &(x, y) in points {
        let dx = x - mean_x;
        ss_xx += dx * dx;
        ss_xy += dx * (y - mean_y);
        scale += x * x;
    }

    if ss_xx <= f64::EPSILON * scale.max(f64::MIN_POSITIVE) {
        return Err(ForecastError::DegenerateInput(
            "all x values are identical".to_string(),
        ));
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(ForecastError::DegenerateInput(
            "trend sums overflow the floating-point range".to_string(),
        ));
    }
    Ok(TrendModel { slope, intercept })
}

/// Fit a line with `x` = position `0..n-1`.
pub fn fit_indexed(values: &[f64]) -> Result<TrendModel> {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();
    fit_trend(&points)
}
