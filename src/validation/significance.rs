//! Predictive-significance tests between two series.
//!
//! [`test_significance`] is a correlation-based approximation of a Granger
//! test, not a rigorous causality test: it reads the Pearson correlation of
//! the aligned series as if it came from a regression with `lags` predictors.
//! [`granger_f_test`] runs the actual restricted/unrestricted lag regressions.
//! Both report the same result shape and use the same 0.05 threshold.

use crate::error::{ForecastError, Result};
use crate::utils::{lag_matrix, ols_fit, pearson};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tracing::warn;

/// Threshold below which a p-value is significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

const P_MIN: f64 = 0.001;
const P_MAX: f64 = 0.999;

const LABEL_SIGNIFICANT: &str = "Time series 1 can predict time series 2";
const LABEL_NOT_SIGNIFICANT: &str = "Time series 1 cannot reliably predict time series 2";

/// Outcome of a significance test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    /// P-value, clamped to `[0.001, 0.999]`
    pub p_value: f64,
    /// F-type statistic (non-negative, infinite for a perfect fit)
    pub statistic: f64,
    /// `p_value < 0.05`
    pub is_significant: bool,
    /// Human-readable verdict
    pub label: String,
}

impl SignificanceResult {
    fn from_statistic(statistic: f64, p_value: f64) -> Self {
        let p_value = p_value.clamp(P_MIN, P_MAX);
        let is_significant = p_value < SIGNIFICANCE_LEVEL;
        Self {
            p_value,
            statistic,
            is_significant,
            label: if is_significant {
                LABEL_SIGNIFICANT
            } else {
                LABEL_NOT_SIGNIFICANT
            }
            .to_string(),
        }
    }

    /// Non-significant result used when the statistic is undefined.
    pub fn neutral() -> Self {
        Self::from_statistic(0.0, 1.0)
    }
}

/// Upper-tail probability of `F(df1, df2)` at `statistic`.
fn f_sf(statistic: f64, df1: f64, df2: f64) -> Result<f64> {
    if statistic.is_nan() {
        return Err(ForecastError::DegenerateInput(
            "test statistic is undefined".to_string(),
        ));
    }
    if statistic.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(df1, df2)
        .map_err(|e| ForecastError::InvalidParameter(format!("F distribution: {}", e)))?;
    Ok(dist.sf(statistic))
}

fn ensure_finite(a: &[f64], b: &[f64]) -> Result<()> {
    if a.iter().chain(b).any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidParameter(
            "series values must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Correlation-based significance heuristic.
///
/// With `n` the aligned length and `r` the Pearson correlation:
/// `statistic = (r² / lags) / ((1 - r²) / (n - 2·lags - 1))`, compared against
/// `F(lags, n - 2·lags - 1)`. Returns the neutral result when `n == 0` or the
/// series are too short for the requested lags. Non-finite values in the
/// aligned prefix are rejected.
pub fn test_significance(
    series_a: &[f64],
    series_b: &[f64],
    lags: usize,
) -> Result<SignificanceResult> {
    if lags == 0 {
        return Err(ForecastError::InvalidParameter(
            "lag count must be positive".to_string(),
        ));
    }

    let n = series_a.len().min(series_b.len());
    ensure_finite(&series_a[..n], &series_b[..n])?;
    let df2 = n as i64 - 2 * lags as i64 - 1;
    if n == 0 || df2 < 1 {
        warn!(n, lags, "series too short for significance test, returning neutral result");
        return Ok(SignificanceResult::neutral());
    }

    let r = pearson(series_a, series_b);
    let r2 = r * r;
    let df1 = lags as f64;
    let df2 = df2 as f64;
    let statistic = if r2 >= 1.0 {
        f64::INFINITY
    } else {
        (r2 / df1) / ((1.0 - r2) / df2)
    };

    Ok(SignificanceResult::from_statistic(
        statistic,
        f_sf(statistic, df1, df2)?,
    ))
}

/// Granger F-test: does `cause` help predict `effect` beyond `effect`'s own lags?
///
/// Fits `effect[t] ~ effect[t-1..=t-lags]` (restricted) and the same plus
/// `cause[t-1..=t-lags]` (unrestricted) on the aligned prefix of both series.
pub fn granger_f_test(cause: &[f64], effect: &[f64], lags: usize) -> Result<SignificanceResult> {
    if lags == 0 {
        return Err(ForecastError::InvalidParameter(
            "lag count must be positive".to_string(),
        ));
    }

    let n = cause.len().min(effect.len());
    let needed = 3 * lags + 2;
    if n < needed {
        return Err(ForecastError::InsufficientData { needed, got: n });
    }
    let (cause, effect) = (&cause[..n], &effect[..n]);
    ensure_finite(cause, effect)?;

    let y = &effect[lags..];
    let own = lag_matrix(effect, lags, lags);
    let mut full = own.clone();
    full.extend(lag_matrix(cause, lags, lags));

    let restricted = ols_fit(y, &own)?;
    let unrestricted = ols_fit(y, &full)?;

    let df1 = lags as f64;
    let df2 = (y.len() - 2 * lags - 1) as f64;
    let gain = (restricted.rss - unrestricted.rss).max(0.0);
    let statistic = if unrestricted.rss > 0.0 {
        (gain / df1) / (unrestricted.rss / df2)
    } else if gain > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    Ok(SignificanceResult::from_statistic(
        statistic,
        f_sf(statistic, df1, df2)?,
    ))
}
